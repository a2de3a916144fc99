//! Simulate command implementation.

use super::output::{
    format_simulation_csv, format_simulation_text, JsonSimulationResult, SimulationStats,
};
use super::{resolve_seed, CliError, SimulateFormat, StanceArg};
use indicatif::{ProgressBar, ProgressStyle};
use kingdom::autoplay::{run_game, AutoplayConfig, Stance};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the thread pool or output fails.
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    stance: StanceArg,
    days: u32,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);
    let stance = Stance::from(stance);
    let config = AutoplayConfig { max_days: days };

    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats; merged once at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(SimulationStats::new, |mut local_stats, i| {
            let result = run_game(base_seed.wrapping_add(i), stance, &config);
            local_stats.add_result(&result);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local_stats
        })
        .reduce(SimulationStats::new, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_simulation_text(&stats, stance));
            println!();
            println!("Duration: {:.2}s ({:.0} games/sec)", duration.as_secs_f64(), games_per_sec);
        }
        SimulateFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSimulationResult::from_stats(&stats, stance))?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_simulation_csv(&stats, stance));
        }
    }

    Ok(())
}
