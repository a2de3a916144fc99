//! Objective catalog validation command implementation.

use super::{load_catalog, CliError};
use kingdom::game::RewardKind;
use std::path::PathBuf;

/// Execute the objectives command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub(crate) fn execute(objectives: Option<PathBuf>) -> Result<(), CliError> {
    match &objectives {
        Some(path) => println!("Validating: {}", path.display()),
        None => println!("Built-in objectives"),
    }
    println!();

    let catalog = load_catalog(objectives.as_deref())?;

    for objective in catalog.entries() {
        let reward = match objective.reward.kind {
            RewardKind::Coins => "coins",
            RewardKind::Peasants => "peasants",
            RewardKind::ExtraActions => "extra actions",
        };
        println!("  ✓ {}: {}", objective.id, objective.description);
        println!(
            "      when {} >= {}, reward {} {reward}",
            objective.counter.name(),
            objective.target_value,
            objective.reward.amount
        );
    }

    println!();
    println!("{} objectives valid.", catalog.entries().len());

    Ok(())
}
