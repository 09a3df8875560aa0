use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

use crate::config::Config;
use crate::interpreter::{preprocess, validate_program, Interpreter, RunReport, RunStatus, Value};

const RIVER_EXTENSION: &str = "rv";

#[derive(Parser)]
#[command(name = "river")]
#[command(about = "River - an interpreter for the River flow language", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a River program
    Run {
        /// Program file (.rv)
        file: PathBuf,

        /// Print the river's journey and the final streams
        #[arg(long)]
        trace: bool,

        /// Print the whole run report as JSON
        #[arg(long)]
        json: bool,

        /// Execution-step budget (overrides config)
        #[arg(long)]
        max_steps: Option<usize>,

        /// Accept files without the .rv extension
        #[arg(long)]
        any_extension: bool,
    },

    /// Preprocess a River program and report problems without running it
    Check {
        /// Program file (.rv)
        file: PathBuf,

        /// Accept files without the .rv extension
        #[arg(long)]
        any_extension: bool,
    },
}

/// Failure to obtain program text
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("River files should have .rv extension: {path}")]
    WrongExtension { path: String },

    #[error("File not found - {path}")]
    NotFound { path: String },

    #[error("Error reading file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read a program file, optionally insisting on the `.rv` extension
pub fn load_source(path: &Path, require_extension: bool) -> Result<String, LoadError> {
    let display = path.display().to_string();

    let extension = path.extension().and_then(|ext| ext.to_str());
    if require_extension && extension != Some(RIVER_EXTENSION) {
        return Err(LoadError::WrongExtension { path: display });
    }

    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound { path: display },
        _ => LoadError::Io {
            path: display,
            source,
        },
    })
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<ExitCode> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Run {
            file,
            trace,
            json,
            max_steps,
            any_extension,
        } => {
            let config = Config::builder()
                .config_path(config_path)
                .max_steps(max_steps)
                .show_trace(trace.then_some(true))
                .require_extension(any_extension.then_some(false))
                .build()
                .context("Failed to load configuration")?;

            let source = load_source(&file, config.require_extension)?;
            tracing::info!(file = %file.display(), max_steps = config.max_steps, "running program");

            let report = Interpreter::from_config(&config).execute(&source);
            tracing::info!(steps = report.steps, outputs = report.outputs.len(), "run finished");

            if json {
                println!("{}", render_json(&report)?);
            } else {
                print!("{}", render_run(&report, config.show_trace));
            }

            if let RunStatus::Halted(halt) = &report.status {
                eprintln!("River halted: {}", halt);
            }
            Ok(ExitCode::from(exit_status(&report.status)))
        }

        Commands::Check {
            file,
            any_extension,
        } => {
            let config = Config::builder()
                .config_path(config_path)
                .require_extension(any_extension.then_some(false))
                .build()
                .context("Failed to load configuration")?;

            let source = load_source(&file, config.require_extension)?;
            let (summary, clean) = render_check(&source);
            print!("{}", summary);

            Ok(if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

/// Process exit status for a finished run; load and config failures exit with 1
fn exit_status(status: &RunStatus) -> u8 {
    match status {
        RunStatus::Completed => 0,
        RunStatus::Halted(_) => 2,
    }
}

/* ===================== Rendering ===================== */

fn render_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize run report")
}

/// Sediment lines, then optionally the journey and the final streams
fn render_run(report: &RunReport, show_trace: bool) -> String {
    let mut out = String::new();
    for value in &report.outputs {
        let _ = writeln!(out, "🌊 {}", value);
    }

    if show_trace {
        let _ = writeln!(out, "\nRiver's Journey:");
        for line in report.trace.lines() {
            let _ = writeln!(out, "{}", line);
        }
        let streams: Vec<String> = report
            .globals
            .iter()
            .map(|(name, value)| format!("{}: {}", name, stream_literal(value)))
            .collect();
        let _ = writeln!(out, "\nFinal Streams: {{{}}}", streams.join(", "));
    }
    out
}

fn stream_literal(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Text(s) => format!("{:?}", s),
    }
}

/// Summary of a preprocessed program; `true` when there are no warnings
fn render_check(source: &str) -> (String, bool) {
    let program = preprocess(source);
    let warnings = validate_program(&program);

    let mut names: Vec<&String> = program.tributaries.keys().collect();
    names.sort();

    let mut out = String::new();
    let _ = writeln!(out, "Main river: {} statements", program.main.len());
    let _ = writeln!(out, "Tributaries: {}", names.len());
    for name in names {
        let _ = writeln!(out, "  {} ({} statements)", name, program.tributaries[name].len());
    }

    if warnings.is_empty() {
        let _ = writeln!(out, "No warnings");
    } else {
        let _ = writeln!(out, "Warnings: {}", warnings.len());
        for warning in &warnings {
            let _ = writeln!(out, "  {}", warning);
        }
    }
    (out, warnings.is_empty())
}
