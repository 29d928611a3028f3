//! Command-line checking of aam files.
//!
//! Drives the validator over files on disk and, with `--fix`, applies the
//! automatic repairs in place. Every edit invalidates the line's findings,
//! so lines are re-validated after each one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::fix::fix;
use crate::grammar::{split_terminated, Line};
use crate::validation::{validate_document, validate_line, Finding, ViolationKind};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command-line arguments for the checker
#[derive(Debug, Parser)]
#[command(name = "aam-check")]
#[command(about = "Check aam key = value files and optionally repair them")]
#[command(version)]
pub struct CheckArgs {
    /// Files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Apply automatic fixes and write the files back
    #[arg(long)]
    pub fix: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Result of checking one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub fixes_applied: usize,
    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// One `path:line:column: code: message` entry per finding, 1-based
    pub fn render_text(&self) -> String {
        self.findings
            .iter()
            .map(|finding| {
                format!(
                    "{}:{}:{}: {}: {}\n",
                    self.path.display(),
                    finding.line() + 1,
                    finding.span.start + 1,
                    finding.kind,
                    finding.message
                )
            })
            .collect()
    }
}

/// Text after automatic repairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    pub applied: usize,
}

/// Repair a single line until no automatic fix applies
pub fn fix_line(index: usize, text: &str) -> FixOutcome {
    let mut current = text.to_string();
    let mut applied = 0;

    loop {
        let findings = validate_line(&Line::new(index, &current));
        let next = findings.iter().find_map(|finding| {
            let context: String = match finding.kind {
                ViolationKind::MissingEqual => current.clone(),
                _ => current
                    .chars()
                    .skip(finding.span.start)
                    .take(finding.span.end.saturating_sub(finding.span.start))
                    .collect(),
            };
            fix(finding, &context)
        });

        let Some(edit) = next else {
            break;
        };
        let repaired = edit.apply(&current);
        if repaired == current {
            break;
        }

        log::debug!("line {}: {:?} -> {:?}", index + 1, current, repaired);
        current = repaired;
        applied += 1;
    }

    FixOutcome {
        text: current,
        applied,
    }
}

/// Repair a whole document, keeping its line terminators
pub fn fix_text(content: &str) -> FixOutcome {
    let mut text = String::with_capacity(content.len());
    let mut applied = 0;

    for (index, (body, terminator)) in split_terminated(content).enumerate() {
        let outcome = fix_line(index, body);
        applied += outcome.applied;
        text.push_str(&outcome.text);
        text.push_str(terminator);
    }

    FixOutcome { text, applied }
}

/// Check one file, optionally repairing it in place
pub fn check_file(path: &Path, apply_fixes: bool) -> Result<FileReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut fixes_applied = 0;
    let content = if apply_fixes {
        let outcome = fix_text(&content);
        if outcome.applied > 0 {
            fs::write(path, &outcome.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Applied {} fixes to {}", outcome.applied, path.display());
        }
        fixes_applied = outcome.applied;
        outcome.text
    } else {
        content
    };

    Ok(FileReport {
        path: path.to_path_buf(),
        fixes_applied,
        findings: validate_document(&content),
    })
}

/// Check every file named in `args` and print the reports.
///
/// Returns `true` when no findings remain.
pub fn run(args: &CheckArgs) -> Result<bool> {
    let reports = args
        .files
        .iter()
        .map(|path| check_file(path, args.fix))
        .collect::<Result<Vec<_>>>()?;

    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", report.render_text());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(reports.iter().all(FileReport::is_clean))
}
