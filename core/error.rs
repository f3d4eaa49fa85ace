use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("JSON Parsing/Serialization Error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory Creation Error: Path '{path}', Error: {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WalkDir Error: {0}")]
    WalkDir(String),

    #[error("Pattern Error: {0}")]
    Pattern(String),

    #[error("Tree Error: {0}")]
    Tree(String),

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Pattern(format!("Regex error: {}", err))
    }
}

impl From<walkdir::Error> for AppError {
    fn from(err: walkdir::Error) -> Self {
        AppError::WalkDir(err.to_string())
    }
}

pub fn error_trace(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = String::new();
    let mut current = err.source();
    while let Some(cause) = current {
        out.push_str("    caused by: ");
        out.push_str(&cause.to_string());
        out.push('\n');
        current = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_lists_every_source() {
        let err = AppError::FileRead {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let trace = error_trace(&err);
        assert_eq!(trace, "    caused by: denied\n");
    }

    #[test]
    fn trace_is_empty_without_sources() {
        let err = AppError::Tree("boom".to_string());
        assert!(error_trace(&err).is_empty());
    }
}
