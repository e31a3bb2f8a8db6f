//! `pyno` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from environment and flags, then start logging.
//! - Dispatch subcommands to the lifecycle service over the on-disk journal.
//!
//! # Invariants
//! - "Today" comes from `--date` when given, otherwise from the local clock,
//!   and is passed explicitly into every core call.

mod watch;

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use log::info;
use pyno_core::{
    config::parse_watch_at, init_logging, init_stderr_logging, parse_body, CleanupOutcome,
    Config, DailyNoteService, DailyRunReport, EnsureOutcome, FsNoteStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pyno", version = pyno_core::core_version(), about = "Daily notes with todo carry-forward")]
struct Cli {
    /// Journal root directory (overrides PYNO_NOTES_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    notes_dir: Option<PathBuf>,

    /// Act as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Log level (overrides PYNO_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create today's note and prune the previous one (default)
    Run,
    /// Create today's note if missing
    Ensure,
    /// Delete the previous note if it holds nothing new
    Cleanup,
    /// Append text to today's note
    Append {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print today's note
    Show {
        /// Print the parsed structure as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run now, then every day after the configured time
    Watch {
        /// Local time of day, HH:MM (overrides PYNO_WATCH_AT)
        #[arg(long, value_parser = parse_time)]
        at: Option<NaiveTime>,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pyno: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.notes_dir {
        config.notes_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    start_logging(&config)?;

    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    info!(
        "event=cli_start module=cli status=ok notes_dir={} today={today}",
        config.notes_dir.display()
    );
    let store = FsNoteStore::new(config.notes_dir.clone());
    let mut service = DailyNoteService::with_policy(store, config.cleanup);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let report = service.run_daily(today)?;
            println!("{}", describe_report(today, &report));
        }
        Command::Ensure => {
            let outcome = service.ensure_today(today)?;
            println!("{}", describe_ensure(today, &outcome));
        }
        Command::Cleanup => {
            let outcome = service.cleanup_previous(today)?;
            println!("{}", describe_cleanup(&outcome));
        }
        Command::Append { text } => {
            service.append_to_today(today, &text.join(" "))?;
        }
        Command::Show { json } => match service.today_note(today)? {
            Some(note) if json => {
                let body = parse_body(&note.body)?;
                let value = serde_json::json!({ "date": note.date, "body": body });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            Some(note) => print!("{}", note.body),
            None => eprintln!("no note for {today}"),
        },
        Command::Watch { at } => {
            if cli.date.is_some() {
                return Err("--date cannot be combined with watch".into());
            }
            watch::run(&mut service, at.unwrap_or(config.watch_at))?;
        }
    }
    Ok(())
}

fn start_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    match &config.log_dir {
        Some(dir) => {
            let dir = dir.to_str().ok_or("log directory is not valid UTF-8")?;
            init_logging(&config.log_level, dir)?;
        }
        None => init_stderr_logging(&config.log_level)?,
    }
    Ok(())
}

pub(crate) fn describe_report(today: NaiveDate, report: &DailyRunReport) -> String {
    format!(
        "{}\n{}",
        describe_ensure(today, &report.ensure),
        describe_cleanup(&report.cleanup)
    )
}

fn describe_ensure(today: NaiveDate, outcome: &EnsureOutcome) -> String {
    match outcome {
        EnsureOutcome::Existing => format!("note for {today} already exists"),
        EnsureOutcome::Created {
            predecessor: Some(previous),
            carried,
        } => format!("created note for {today} ({carried} todo(s) carried from {previous})"),
        EnsureOutcome::Created {
            predecessor: None, ..
        } => format!("created note for {today}"),
    }
}

fn describe_cleanup(outcome: &CleanupOutcome) -> String {
    match outcome {
        CleanupOutcome::NoPrevious => "no previous note to clean up".to_string(),
        CleanupOutcome::Deleted { date } => format!("deleted {date}: nothing new"),
        CleanupOutcome::Kept { date, reason } => format!("kept {date} ({reason:?})"),
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    parse_watch_at(value).map_err(|err| err.to_string())
}
