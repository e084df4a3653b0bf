//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.advising-dashboard.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::OutputFormat;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".advising-dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Page sizes for the table views.
    #[serde(default)]
    pub view: ViewConfig,

    /// Summary dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Spreadsheet endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Web app URL returning `{"data": [...]}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Extra attempts after a transport failure.
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> usize {
    2
}

/// Page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Rows per page for compact tables.
    #[serde(default = "default_summary_page_size")]
    pub summary_page_size: usize,

    /// Rows per page for the student roster and advisor detail tables.
    #[serde(default = "default_full_page_size")]
    pub full_page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            summary_page_size: default_summary_page_size(),
            full_page_size: default_full_page_size(),
        }
    }
}

fn default_summary_page_size() -> usize {
    10
}

fn default_full_page_size() -> usize {
    15
}

/// Summary dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Programs that get their own card on the summary dashboard.
    #[serde(default = "default_highlighted_programs")]
    pub highlighted_programs: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            highlighted_programs: default_highlighted_programs(),
        }
    }
}

fn default_highlighted_programs() -> Vec<String> {
    vec![
        "Sistem Informasi",
        "Teknik Informatika",
        "Teknik Multimedia Dan Jaringan",
        "Komputerisasi Akuntansi",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Report output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format used when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,

    /// Output file used when `--output` is not given. Stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject values no view can work with.
    pub fn validate(&self) -> Result<()> {
        if self.view.summary_page_size == 0 || self.view.full_page_size == 0 {
            bail!("Page sizes must be at least 1");
        }
        if self.source.timeout_seconds == 0 {
            bail!("Source timeout must be at least 1 second");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.url {
            self.source.url = Some(url.clone());
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref output) = args.output {
            self.report.output = Some(output.display().to_string());
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
