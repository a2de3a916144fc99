//! Kingdom CLI - Play, autoplay and simulate Kingdom games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Log file written while the TUI owns the terminal, under the temp dir.
const PLAY_LOG: &str = "kingdom.log";

/// Kingdom - A turn-based kingdom-defense game
#[derive(Parser, Debug)]
#[command(name = "kingdom")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively in the terminal (logs go to kingdom.log in the temp dir)
    Play {
        /// Random seed for spawn rolls (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Objective catalog (JSON)
        #[arg(short, long)]
        objectives: Option<PathBuf>,

        /// Delay before the Enemy and Income phases resolve, in milliseconds
        #[arg(long, default_value = "1500")]
        speed: u64,
    },

    /// Autoplay a single game
    Run {
        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Scripted player
        #[arg(long, default_value = "balanced")]
        stance: cli::StanceArg,

        /// Stop once this day is reached
        #[arg(short, long, default_value = "100")]
        days: u32,

        /// Objective catalog (JSON)
        #[arg(short, long)]
        objectives: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the event log
        #[arg(short, long)]
        quiet: bool,
    },

    /// Autoplay many games in parallel and aggregate statistics
    Simulate {
        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Scripted player
        #[arg(long, default_value = "balanced")]
        stance: cli::StanceArg,

        /// Stop each game once this day is reached
        #[arg(short, long, default_value = "100")]
        days: u32,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Validate and list an objective catalog
    Objectives {
        /// Objective catalog (JSON, default: built-in)
        objectives: Option<PathBuf>,
    },
}

/// Where diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File,
}

impl Commands {
    /// The TUI redraws the whole terminal, so `play` must not log to it.
    const fn log_target(&self) -> LogTarget {
        match self {
            Commands::Play { .. } => LogTarget::File,
            _ => LogTarget::Stderr,
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file and must live until exit.
fn init_logging(target: LogTarget) -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if target == LogTarget::File {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(PLAY_LOG)
            .build(std::env::temp_dir());
        match appender {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                tracing_subscriber::fmt()
                    .with_env_filter(filter())
                    .with_writer(writer)
                    .with_ansi(false)
                    .init();
                return Some(guard);
            }
            Err(e) => {
                eprintln!("Warning: no log file ({e}), logging disabled");
                return None;
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .init();
    None
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _log_guard = init_logging(args.command.log_target());

    let result = match args.command {
        Commands::Play {
            seed,
            objectives,
            speed,
        } => cli::play::execute(seed, objectives, speed),

        Commands::Run {
            seed,
            stance,
            days,
            objectives,
            format,
            quiet,
        } => cli::run::execute(seed, stance, days, objectives, format, quiet),

        Commands::Simulate {
            games,
            seed,
            threads,
            stance,
            days,
            format,
            progress,
        } => cli::simulate::execute(games, seed, threads, stance, days, format, progress),

        Commands::Objectives { objectives } => cli::objectives::execute(objectives),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(argv: &[&str]) -> LogTarget {
        Args::try_parse_from(argv).unwrap().command.log_target()
    }

    #[test]
    fn test_play_logs_to_file() {
        assert_eq!(target(&["kingdom", "play"]), LogTarget::File);
        assert_eq!(target(&["kingdom", "play", "--seed", "3"]), LogTarget::File);
    }

    #[test]
    fn test_headless_commands_log_to_stderr() {
        assert_eq!(target(&["kingdom", "run", "--quiet"]), LogTarget::Stderr);
        assert_eq!(target(&["kingdom", "simulate", "-g", "5"]), LogTarget::Stderr);
        assert_eq!(target(&["kingdom", "objectives"]), LogTarget::Stderr);
    }
}
