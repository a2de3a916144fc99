//! CLI command implementations for Kingdom.

pub(crate) mod objectives;
pub(crate) mod play;
pub(crate) mod run;
pub(crate) mod simulate;

mod output;

use clap::ValueEnum;
use kingdom::autoplay::Stance;
use kingdom::ObjectiveCatalog;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Scripted player selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StanceArg {
    /// Ends every phase without acting.
    Idle,
    /// Builds farms.
    Farmer,
    /// Builds walls and trains archers.
    Warden,
    /// Farms first, then defends.
    Balanced,
}

impl From<StanceArg> for Stance {
    fn from(arg: StanceArg) -> Self {
        match arg {
            StanceArg::Idle => Stance::Idle,
            StanceArg::Farmer => Stance::Farmer,
            StanceArg::Warden => Stance::Warden,
            StanceArg::Balanced => Stance::Balanced,
        }
    }
}

/// Load an objective catalog from a JSON file, or the built-in one.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<ObjectiveCatalog, CliError> {
    let Some(path) = path else {
        return Ok(ObjectiveCatalog::default());
    };
    let json = fs::read_to_string(path)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
    ObjectiveCatalog::from_json(&json)
        .map_err(|e| CliError::new(format!("Invalid objectives in {}: {e}", path.display())))
}

/// Use the given seed, or derive one from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<kingdom::ConfigError> for CliError {
    fn from(e: kingdom::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
