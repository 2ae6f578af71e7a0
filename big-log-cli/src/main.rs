//! BIG Log Reader CLI Application
//!
//! This is the command-line interface for the BIG log parser.
//! It uses the big-log-parser library and adds:
//! - Command-line and TOML configuration
//! - Logger setup
//! - Report rendering (TXT/JSON)

use anyhow::{Context, Result};
use big_log_parser::{LogScanner, Report};
use chrono::Local;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

mod config;
mod report;

use config::{AppConfig, OutputFormat};

/// BIG Log Reader - Build a device status report from a telemetry log
#[derive(Parser, Debug)]
#[command(name = "big-log-cli")]
#[command(about = "Build a device status report from BIG telemetry messages", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the log file to scan (default: app_2.log)
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of lines to scan (for testing/sampling)
    #[arg(long, value_name = "COUNT")]
    max_lines: Option<usize>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("BIG Log Reader CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using parser library v{}", big_log_parser::VERSION);

    let config = resolve_config(&args)?;
    log::debug!("Effective configuration: {:?}", config);

    let report = scan(&config)?;
    let rendered = render(&report, &config)?;

    match &config.output.path {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(log_path) = &args.log {
        config.input.file = log_path.clone();
    }
    if args.max_lines.is_some() {
        config.input.max_lines = args.max_lines;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }

    Ok(config)
}

/// Scan the configured log file
fn scan(config: &AppConfig) -> Result<Report> {
    let scanner = LogScanner::new(config.scan_config());
    let report = scanner
        .scan_file(&config.input.file)
        .with_context(|| format!("Failed to scan log file: {:?}", config.input.file))?;

    if report.total_malformed() > 0 {
        log::warn!(
            "{} of {} BIG lines were skipped",
            report.total_malformed(),
            report.total_seen
        );
    }

    Ok(report)
}

fn render(report: &Report, config: &AppConfig) -> Result<String> {
    let rendered = match config.output.format {
        OutputFormat::Txt => report::render_txt(report, &config.input.file, Local::now()),
        OutputFormat::Json => {
            let mut json = report::render_json(report).context("Failed to serialize report")?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
