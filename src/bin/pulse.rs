//! Pulse CLI - command-line interface for the quitpulse engine
//!
//! Commands:
//! - report: Build a full progress report from an exported log batch
//! - validate: Parse a log batch and report normalization statistics
//! - milestones: Print milestone status for a given quit date

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use quitpulse::pipeline::DEFAULT_WINDOW_DAYS;
use quitpulse::{EngineConfig, EngineError, ProgressEngine, ENGINE_VERSION};

/// Pulse - progress and health-metrics engine for habit-recovery tracking
#[derive(Parser)]
#[command(name = "pulse")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute wellness metrics from habit-recovery logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a full progress report from an exported log batch
    Report {
        /// Input log batch JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Engine configuration JSON file (defaults baked in when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Quit date (YYYY-MM-DD)
        #[arg(long)]
        quit_date: String,

        /// Evaluate as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,

        /// Trailing aggregation window in days
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        window_days: u32,

        /// Cumulative amount saved over the period
        #[arg(long, default_value_t = 0.0)]
        total_saved: f64,

        /// Previously persisted longest streak
        #[arg(long, default_value_t = 0)]
        longest_streak: u32,
    },

    /// Parse a log batch and report normalization statistics
    Validate {
        /// Input log batch JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print milestone status for a given quit date
    Milestones {
        /// Quit date (YYYY-MM-DD)
        #[arg(long)]
        quit_date: String,

        /// Evaluate as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,

        /// Engine configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct CliError {
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let envelope = CliError { error: e.to_string() };
            eprintln!(
                "{}",
                serde_json::to_string(&envelope).unwrap_or_else(|_| e.to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PulseCliError> {
    match cli.command {
        Commands::Report {
            input,
            output,
            config,
            quit_date,
            as_of,
            window_days,
            total_saved,
            longest_streak,
        } => cmd_report(
            &input,
            &output,
            config.as_deref(),
            &quit_date,
            as_of.as_deref(),
            window_days,
            total_saved,
            longest_streak,
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Milestones {
            quit_date,
            as_of,
            config,
            json,
        } => cmd_milestones(&quit_date, as_of.as_deref(), config.as_deref(), json),
    }
}

fn cmd_report(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    quit_date: &str,
    as_of: Option<&str>,
    window_days: u32,
    total_saved: f64,
    longest_streak: u32,
) -> Result<(), PulseCliError> {
    let engine = ProgressEngine::new(load_config(config_path)?);

    let raw_json = read_input(input)?;
    let entries = engine.normalize_json(&raw_json)?;

    let quit_date = parse_date(quit_date)?;
    let today = match as_of {
        Some(raw) => parse_date(raw)?,
        None => engine.today(),
    };

    let report = engine.report_json(
        &entries,
        quit_date,
        today,
        window_days,
        total_saved,
        longest_streak,
    )?;

    write_output(output, &report)
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), PulseCliError> {
    let raw_json = read_input(input)?;
    let engine = ProgressEngine::default();
    let entries = engine.normalize_json(&raw_json)?;

    #[derive(Serialize)]
    struct ValidationReport {
        entries: usize,
        with_value: usize,
        with_sleep: usize,
        earliest: Option<NaiveDate>,
        latest: Option<NaiveDate>,
    }

    let report = ValidationReport {
        entries: entries.len(),
        with_value: entries.iter().filter(|e| e.value.is_some()).count(),
        with_sleep: entries.iter().filter(|e| e.sleep_hours.is_some()).count(),
        earliest: entries.iter().map(|e| e.local_date).min(),
        latest: entries.iter().map(|e| e.local_date).max(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("entries:    {}", report.entries);
        println!("with value: {}", report.with_value);
        println!("with sleep: {}", report.with_sleep);
        if let (Some(earliest), Some(latest)) = (report.earliest, report.latest) {
            println!("dates:      {earliest} .. {latest}");
        }
    }

    Ok(())
}

fn cmd_milestones(
    quit_date: &str,
    as_of: Option<&str>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), PulseCliError> {
    let engine = ProgressEngine::new(load_config(config_path)?);

    let quit_date = parse_date(quit_date)?;
    let today = match as_of {
        Some(raw) => parse_date(raw)?,
        None => engine.today(),
    };
    let days_since_quit = (today - quit_date).num_days();

    let statuses = engine.evaluate_milestones(days_since_quit);

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("{days_since_quit} days since quit");
    for status in &statuses {
        let marker = if status.achieved { "x" } else { " " };
        if status.achieved {
            println!("[{marker}] {}", status.milestone.title);
        } else {
            println!(
                "[{marker}] {} ({} days remaining, {:.0}%)",
                status.milestone.title, status.days_remaining, status.progress_percent
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, PulseCliError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            EngineConfig::from_json(&json).map_err(|e| {
                PulseCliError::Engine(EngineError::ConfigError(format!(
                    "{}: {e}",
                    path.display()
                )))
            })
        }
        None => Ok(EngineConfig::default()),
    }
}

fn read_input(input: &Path) -> Result<String, PulseCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(PulseCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), PulseCliError> {
    if output.to_string_lossy() == "-" {
        println!("{data}");
        Ok(())
    } else {
        fs::write(output, data)?;
        Ok(())
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, PulseCliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| PulseCliError::Date(format!("expected YYYY-MM-DD, got '{raw}'")))
}

#[derive(Debug, thiserror::Error)]
enum PulseCliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    Date(String),

    #[error("No input: stdin is a terminal, pass --input FILE or pipe data")]
    NoInput,
}
