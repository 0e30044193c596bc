//! # RSML CLI
//!
//! `rsml eval` evaluates documents against the probed host (or a machine
//! described with flags), `check` validates without evaluating, `tokens`
//! and `format` expose the lexer, and `host` prints the probe result.
//!
//! Exit status is 0 on success or match, 1 when an evaluated document did
//! not match, 2 on any error.

mod commands;
mod discovery;
mod error;
mod machine;
mod report;

use clap::{Parser, Subcommand};
use commands::Outcome;
use error::CliError;
use machine::MachineArgs;
use rsml_toolchain::config::runtime::{parse_log_level, LogLevel};
use rsml_toolchain::config::RuntimeConfig;
use rsml_toolchain::logging::{self, ConsoleLogger, FileLogger, Logger, LoggingService, StructuredLogger};
use rsml_toolchain::log_debug;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "rsml", version, about = "Evaluate and inspect RSML documents")]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write toolchain events to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Minimum toolchain event level (error, warning, info, debug)
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LogLevel>,

    /// Emit toolchain events as JSON
    #[arg(long, global = true)]
    structured_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a document, or every document under a directory
    Eval {
        path: PathBuf,
        #[command(flatten)]
        machine: MachineArgs,
        #[arg(long)]
        json: bool,
    },
    /// Validate documents without evaluating them
    Check {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the raw tokens of every line
    Tokens {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print a document with canonical spacing
    Format {
        file: PathBuf,
        /// Rewrite the file instead of printing
        #[arg(long)]
        write: bool,
    },
    /// Print the machine descriptor of this host
    Host {
        #[command(flatten)]
        machine: MachineArgs,
        #[arg(long)]
        json: bool,
    },
}

fn parse_level(level: &str) -> Result<LogLevel, String> {
    parse_log_level(level).ok_or_else(|| format!("unknown log level '{}'", level))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let outcome = run(&cli).unwrap_or_else(|error| commands::report_failure(&error));
    outcome.into()
}

fn run(cli: &Cli) -> Result<Outcome, CliError> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::default(),
    };
    init_logging(cli, &config)?;
    log_debug!("Runtime configuration loaded",
        "config" => cli.config.as_ref().map_or("<defaults>".to_string(), |p| p.display().to_string())
    );

    match &cli.command {
        Command::Eval {
            path,
            machine,
            json,
        } => commands::eval(path, machine, *json, &config.evaluation),
        Command::Check { path, json } => commands::check(path, *json),
        Command::Tokens { file, json } => commands::tokens(file, *json),
        Command::Format { file, write } => commands::format(file, *write),
        Command::Host { machine, json } => commands::host(machine, *json),
    }
}

/// Install the toolchain logger
///
/// Events go to `--log-file` when given, otherwise to stderr when console
/// logging is enabled (by configuration or by passing `--log-level`).
/// Without either the toolchain stays silent.
fn init_logging(cli: &Cli, config: &RuntimeConfig) -> Result<(), CliError> {
    let mut preferences = config.logging.clone();
    if let Some(level) = cli.log_level {
        preferences.min_log_level = level;
        preferences.enable_console_logging = true;
    }
    if cli.structured_logs {
        preferences.use_structured_logging = true;
    }

    let min_level = preferences.min_log_level.to_events_log_level();
    let structured = preferences.use_structured_logging;
    let console = preferences.enable_console_logging;
    logging::config::init_runtime_preferences(preferences).map_err(CliError::Logging)?;

    let logger: Arc<dyn Logger> = match &cli.log_file {
        Some(path) => Arc::new(
            FileLogger::new(path, min_level, structured).map_err(|source| CliError::Output {
                path: path.clone(),
                source,
            })?,
        ),
        None if !console => return Ok(()),
        None if structured => Arc::new(StructuredLogger::new(min_level)),
        None => Arc::new(ConsoleLogger::new(min_level)),
    };

    logging::init_global_logging_with_service(Arc::new(LoggingService::new(logger, min_level)))
        .map_err(CliError::Logging)
}
