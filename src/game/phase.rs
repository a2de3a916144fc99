//! Phase transitions.
//!
//! The day runs `Player -> Build -> Enemy -> Income -> Player`. The first two
//! end when the player says so; the last two are driven by the engine once
//! their pacing delay elapses. A fallen kingdom never transitions again.

use tracing::info;

use crate::game::{GameConfig, GameState, Phase};

/// Move to the next phase.
///
/// Returns `None` once the game is over. Leaving `Income` pays the farms,
/// starts a new day and sends any enemies still on the board home.
#[must_use]
pub fn advance(state: &GameState, config: &GameConfig) -> Option<GameState> {
    if state.game_over {
        return None;
    }

    let mut next = state.clone();
    next.phase = state.phase.next();

    match state.phase {
        Phase::Player => {
            next.reset_actions(config);
            next.event_log
                .record("Build phase begins. Construct your defenses.");
        }
        Phase::Build => {
            next.event_log.record("Night falls. The Greed advance...");
        }
        Phase::Enemy => {
            next.event_log.record("The sun rises. You survived the night.");
        }
        Phase::Income => {
            let income = state.projected_income(config);
            next.coins = next.coins.saturating_add(income);
            next.coins_earned = next.coins_earned.saturating_add(income);
            next.day += 1;
            next.reset_actions(config);
            next.enemies.clear();
            next.event_log
                .record(format!("You collected {income} coins from your farms."));
        }
    }

    info!(day = next.day, from = %state.phase, to = %next.phase, "phase transition");
    Some(next)
}
