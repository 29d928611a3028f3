//! Configuration management for the aam language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Discovery and parsing of the TOML configuration file
//! - Deciding which documents belong to the aam grammar

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".aam-ls.toml";

/// Severity used when publishing findings as diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Information,
    Hint,
}

/// Command-line arguments for the aam language server
#[derive(Debug, Parser)]
#[command(name = "aam-ls")]
#[command(about = "Language server for aam key = value files")]
#[command(version)]
pub struct Args {
    /// Explicit configuration file
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Override the severity from the configuration file
    #[arg(long, value_enum, help = "Severity of published diagnostics")]
    pub severity: Option<Severity>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Settings read from a configuration file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub language_ids: Vec<String>,
    pub extensions: Vec<String>,
    pub severity: Severity,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            language_ids: vec!["aam".to_string()],
            extensions: vec!["aam".to_string()],
            severity: Severity::Error,
        }
    }
}

impl FileConfig {
    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Editor language identifiers treated as aam
    pub language_ids: Vec<String>,
    /// File extensions (without the dot) treated as aam
    pub extensions: Vec<String>,
    /// Severity of published diagnostics
    pub severity: Severity,
    /// Log level
    pub log_level: String,
    /// Configuration file in effect, if any
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file_config(FileConfig::default(), "info".to_string(), None)
    }
}

impl Config {
    /// Create configuration from command-line arguments and the working directory
    pub fn from_args_and_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        Self::from_args(Args::parse(), &cwd)
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args, cwd: &Path) -> Result<Self> {
        // An explicit path must load; discovered ones are only used if present
        let config_path = match args.config {
            Some(path) => Some(path),
            None => Self::discover(cwd),
        };

        let file_config = match &config_path {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        let mut config = Self::from_file_config(file_config, args.log_level, config_path);
        if let Some(severity) = args.severity {
            config.severity = severity;
        }
        Ok(config)
    }

    fn from_file_config(file: FileConfig, log_level: String, config_path: Option<PathBuf>) -> Self {
        let extensions = file
            .extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        Config {
            language_ids: file.language_ids,
            extensions,
            severity: file.severity,
            log_level,
            config_path,
        }
    }

    /// Locations searched for a configuration file, in priority order
    pub fn candidate_paths(cwd: &Path) -> Vec<PathBuf> {
        let mut paths = vec![cwd.join(PROJECT_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("aam-ls").join("config.toml"));
        }
        paths
    }

    /// First existing configuration file, if any
    pub fn discover(cwd: &Path) -> Option<PathBuf> {
        Self::candidate_paths(cwd)
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Whether a document is written in the aam grammar
    pub fn accepts_document(&self, language_id: &str, path: &Path) -> bool {
        if self.language_ids.iter().any(|id| id == language_id) {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}
