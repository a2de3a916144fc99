//! Run command implementation.

use super::output::{format_text, JsonGameResult};
use super::{load_catalog, resolve_seed, CliError, OutputFormat, StanceArg};
use kingdom::autoplay::{play_kingdom, AutoplayConfig, GameResult, Stance};
use kingdom::{GameConfig, Kingdom};
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the objective catalog cannot be loaded.
pub(crate) fn execute(
    seed: Option<u64>,
    stance: StanceArg,
    days: u32,
    objectives: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let catalog = load_catalog(objectives.as_deref())?;
    let seed = resolve_seed(seed);
    let stance = Stance::from(stance);
    let config = AutoplayConfig { max_days: days };

    if !quiet && format == OutputFormat::Text {
        println!("Running game with seed {seed} ({stance})...");
        println!();
    }

    let kingdom = Kingdom::new(GameConfig::default(), catalog)?;
    let kingdom = play_kingdom(kingdom, seed, stance, &config);
    let result = GameResult::from_kingdom(seed, stance, &kingdom);

    match format {
        OutputFormat::Text => {
            if !quiet {
                let mut log: Vec<&str> = kingdom.state().event_log.iter().collect();
                log.reverse();
                for line in log {
                    println!("  {line}");
                }
                println!();
            }
            print!("{}", format_text(&result, &kingdom));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonGameResult::new(result, &kingdom))?;
            println!("{json}");
        }
    }

    Ok(())
}
