//! Advising Dashboard - academic advising reports from a spreadsheet API
//!
//! A CLI tool that loads the student advising roster from a spreadsheet
//! web app (or a saved response) and renders one dashboard view as a
//! Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or argument error (config, output write, bad flags, etc.)
//!   2 - The load failed and there is no data to show

mod analysis;
mod cli;
mod config;
mod dashboard;
mod models;
mod report;
mod source;
mod store;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dashboard::{Dashboard, View};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata};
use source::{DataSource, FetchOutcome, LoadError, SourceClient};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args);
    }

    init_logging(&args)?;

    info!("Advising Dashboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write a default config file.
fn handle_init_config(args: &Args) -> Result<()> {
    let path = args
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✅ Created {} with default settings.", path.display());
    println!("   Set [source] url to your spreadsheet web app to get started.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load, render and write one view. Returns the exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let source = build_source(&args, &config)?;
    let mut dashboard = Dashboard::new(&config);

    let result = load_with_progress(&source, args.quiet).await;
    let load_failed = result.is_err();
    dashboard.apply_fetch(result);

    apply_view_state(&mut dashboard, &args);
    let content = dashboard.render();

    let report = Report {
        metadata: ReportMetadata {
            source: source.describe(),
            view: args.view,
            generated_at: Utc::now(),
            loaded_at: dashboard.store().loaded_at(),
            total_records: dashboard.store().len(),
        },
        message: dashboard.message().cloned(),
        content,
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match config.report.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;

            if !args.quiet {
                println!("📊 {} students loaded", dashboard.store().len());
                println!("✅ Report saved to: {}", path);
            }
        }
        None => print!("{}", output),
    }

    if load_failed && dashboard.store().is_empty() {
        eprintln!("\n⛔ No data could be loaded from {}.", source.describe());
        return Ok(2);
    }

    Ok(0)
}

/// Run the one load for this invocation, with a spinner for remote fetches.
async fn load_with_progress(source: &DataSource, quiet: bool) -> Result<FetchOutcome, LoadError> {
    let spinner = match source {
        DataSource::Remote(client) if !quiet => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Fetching {}", client.url()));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        }
        _ => None,
    };

    let result = source.load().await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result
}

/// Translate the command-line selections into dashboard operations.
fn apply_view_state(dashboard: &mut Dashboard, args: &Args) {
    dashboard.show(args.view);
    dashboard.set_query(args.search.as_deref());
    dashboard.set_program_filter(args.program.as_deref());
    dashboard.set_scholarship_filter(args.scholarship.as_deref());
    dashboard.set_advisor_query(args.advisor_search.as_deref());
    dashboard.select_stats_program(args.stats_program.as_deref());

    if args.view == View::AdvisorDetail {
        dashboard.select_advisor(args.advisor.as_deref());
    }

    dashboard.go_to_page(args.page);
}

/// Pick the snapshot file or the configured endpoint.
fn build_source(args: &Args, config: &Config) -> Result<DataSource> {
    if let Some(ref input) = args.input {
        info!("Using snapshot file: {}", input.display());
        return Ok(DataSource::Snapshot(input.clone()));
    }

    match config.source.url {
        Some(ref url) => Ok(DataSource::Remote(SourceClient::new(url, &config.source)?)),
        None => bail!(
            "No data source: pass --url or --input, or set [source] url in {}",
            CONFIG_FILE_NAME
        ),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
