use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::cli_args::FormatOutputOpts;

pub fn print_snapshot_or_save(content: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            write_to_file(path, content)?;
            if !quiet {
                println!(
                    "{} Snapshot saved to: {}",
                    "✅".green(),
                    path.display().to_string().blue()
                );
            }
        }
        None => {
            write_to_stdout(content)?;
        }
    }
    Ok(())
}

pub fn print_data_or_text<T: Serialize>(
    data: &T,
    plain_text: Option<String>,
    format_opts: &FormatOutputOpts,
) -> Result<()> {
    let format = format_opts.format.as_deref().unwrap_or("text").to_lowercase();

    match (format.as_str(), plain_text) {
        ("text", Some(text)) => write_to_stdout(&text),
        _ => {
            let content =
                serde_json::to_string_pretty(data).context("Failed to serialize output to JSON")?;
            write_to_stdout(&content)
        }
    }
}

pub fn print_warnings(warnings: &[String], quiet: bool) {
    if warnings.is_empty() || quiet {
        return;
    }
    eprintln!(
        "\n{}",
        "⚠️ Warning: Some paths could not be read and were skipped:".yellow()
    );
    for warning in warnings {
        eprintln!(" - {}", warning);
    }
    eprintln!("---");
}

pub struct DecisionRow<'a> {
    pub path: &'a str,
    pub excluded: bool,
    pub included: bool,
    pub in_excluded_dir: bool,
    pub selected: bool,
}

pub fn print_decision_table(rows: &[DecisionRow]) {
    if rows.is_empty() {
        println!("{}", "(No files found)".dimmed());
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Path").fg(Color::Green),
        Cell::new("Excluded").fg(Color::Green),
        Cell::new("Included").fg(Color::Green),
        Cell::new("In Excluded Dir").fg(Color::Green),
        Cell::new("Selected").fg(Color::Green),
    ]);
    for row in rows {
        let verdict = if row.selected {
            Cell::new("yes").fg(Color::Cyan)
        } else {
            Cell::new("no").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(row.path).fg(Color::Cyan),
            flag_cell(row.excluded),
            flag_cell(row.included),
            flag_cell(row.in_excluded_dir),
            verdict,
        ]);
    }
    println!("{table}");
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("x")
    } else {
        Cell::new("").fg(Color::DarkGrey)
    }
}

fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
