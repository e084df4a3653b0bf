//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dashboard::View;

/// Advising Dashboard - academic advising reports from a spreadsheet API
///
/// Fetches the student advising roster (program of study, academic advisor,
/// scholarship status) and renders one dashboard view as Markdown or JSON.
///
/// Examples:
///   advising-dashboard --url https://script.google.com/macros/s/<id>/exec
///   advising-dashboard --input snapshot.json --view students --program "Sistem Informasi"
///   advising-dashboard --input snapshot.json --view advisor-detail --advisor "Dr. Budi" --page 2
///   advising-dashboard --input snapshot.json --view analytics --format json
///   advising-dashboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Spreadsheet web app URL to fetch records from
    ///
    /// Can also be set via ADVISING_SOURCE_URL or `[source] url` in the config file.
    #[arg(
        short,
        long,
        value_name = "URL",
        env = "ADVISING_SOURCE_URL",
        conflicts_with = "input"
    )]
    pub url: Option<String>,

    /// Read records from a saved response body instead of fetching
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Dashboard view to render
    #[arg(long, value_enum, default_value = "dashboard")]
    pub view: View,

    /// Search students by name or NIM (case-insensitive)
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Only students in this program of study ("all" for no filter)
    #[arg(long, value_name = "NAME")]
    pub program: Option<String>,

    /// Only students with this scholarship status ("all" for no filter)
    #[arg(long, value_name = "NAME")]
    pub scholarship: Option<String>,

    /// Academic advisor whose students to show (advisor-detail view)
    #[arg(short, long, value_name = "NAME")]
    pub advisor: Option<String>,

    /// Search the advisor roster by name (advisors view)
    #[arg(long, value_name = "TEXT")]
    pub advisor_search: Option<String>,

    /// Program to break down on the programs view
    #[arg(long, value_name = "NAME")]
    pub stats_program: Option<String>,

    /// Page number for paginated tables (1-based)
    #[arg(short, long, default_value = "1", value_name = "N")]
    pub page: usize,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .advising-dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .advising-dashboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Source URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // View-specific filters
        use View::*;
        self.check_scope("--program", self.program.is_some(), &[Students])?;
        self.check_scope("--search", self.search.is_some(), &[Students, AdvisorDetail])?;
        self.check_scope(
            "--scholarship",
            self.scholarship.is_some(),
            &[Students, AdvisorDetail],
        )?;
        self.check_scope("--advisor", self.advisor.is_some(), &[AdvisorDetail])?;
        self.check_scope("--advisor-search", self.advisor_search.is_some(), &[Advisors])?;
        self.check_scope("--stats-program", self.stats_program.is_some(), &[Programs])?;

        Ok(())
    }

    fn check_scope(&self, flag: &str, given: bool, views: &[View]) -> Result<(), String> {
        if given && !views.contains(&self.view) {
            let names: Vec<String> = views.iter().map(|v| format!("--view {}", v)).collect();
            return Err(format!("{} only applies to {}", flag, names.join(" or ")));
        }
        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
