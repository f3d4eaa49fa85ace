use crate::error::Result;
use log;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRole {
    Exclude,
    Include,
    LegacyExclude,
}

#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    role: PatternRole,
    regex: Regex,
}

impl Matcher {
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn role(&self) -> PatternRole {
        self.role
    }

    pub fn regex_str(&self) -> &str {
        self.regex.as_str()
    }
}

pub fn wildcard_to_regex(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}

pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn normalized_root(root: &str) -> String {
    let root = normalize_separators(root);
    root.trim_end_matches('/').to_string()
}

pub fn compile_exclude(pattern: &str, root: &str) -> Result<Matcher> {
    let expr = format!(
        "^{}/\\.?{}.*$",
        regex::escape(&normalized_root(root)),
        wildcard_to_regex(pattern)
    );
    log::trace!("Compiled exclude pattern '{}' as {}", pattern, expr);
    Ok(Matcher {
        pattern: pattern.to_string(),
        role: PatternRole::Exclude,
        regex: Regex::new(&expr)?,
    })
}

pub fn compile_include(pattern: &str) -> Result<Matcher> {
    let expr = format!("^.*/{}$", wildcard_to_regex(pattern));
    log::trace!("Compiled include pattern '{}' as {}", pattern, expr);
    Ok(Matcher {
        pattern: pattern.to_string(),
        role: PatternRole::Include,
        regex: Regex::new(&expr)?,
    })
}

pub fn compile_legacy_exclude(pattern: &str) -> Result<Matcher> {
    let expr = format!("^.*{}(/.*)?$", wildcard_to_regex(pattern));
    log::trace!("Compiled legacy exclude pattern '{}' as {}", pattern, expr);
    Ok(Matcher {
        pattern: pattern.to_string(),
        role: PatternRole::LegacyExclude,
        regex: Regex::new(&expr)?,
    })
}

#[derive(Debug, Clone)]
pub struct PatternSet {
    role: PatternRole,
    matchers: Vec<Matcher>,
}

impl PatternSet {
    pub fn empty(role: PatternRole) -> Self {
        Self {
            role,
            matchers: Vec::new(),
        }
    }

    pub fn excludes(patterns: &[String], root: &str) -> Result<Self> {
        Self::build(PatternRole::Exclude, patterns, |p| compile_exclude(p, root))
    }

    pub fn includes(patterns: &[String]) -> Result<Self> {
        Self::build(PatternRole::Include, patterns, compile_include)
    }

    pub fn legacy_excludes(patterns: &[String]) -> Result<Self> {
        Self::build(PatternRole::LegacyExclude, patterns, compile_legacy_exclude)
    }

    fn build<F>(role: PatternRole, patterns: &[String], compile: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Matcher>,
    {
        let mut matchers = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            // A blank pattern would compile to "match everything".
            if pattern.trim().is_empty() {
                log::warn!("Ignoring blank {:?} pattern in configuration", role);
                continue;
            }
            matchers.push(compile(pattern)?);
        }
        log::debug!("Built {:?} pattern set with {} matchers", role, matchers.len());
        Ok(Self { role, matchers })
    }

    pub fn role(&self) -> PatternRole {
        self.role
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matcher> {
        self.matchers.iter()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn first_match(&self, path: &str) -> Option<&Matcher> {
        self.matchers.iter().find(|m| m.matches(path))
    }
}
