//! Game invariants - sanity checks that detect bugs.
//!
//! No sequence of commands should ever break these. They are used by the
//! property tests and the fuzzer after every step.

use crate::game::{GameConfig, GameState};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState, config: &GameConfig) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut violation = |message: String| violations.push(InvariantViolation { message });

    let len = state.world.len();
    if len != config.board_size {
        violation(format!("World has {len} tiles, config says {}", config.board_size));
    }
    if state.player_pos >= len {
        violation(format!("Player at {} is off a {len}-tile board", state.player_pos));
    }
    if state.crown_pos >= len {
        violation(format!("Crown at {} is off a {len}-tile board", state.crown_pos));
    }

    for enemy in &state.enemies {
        if enemy.position >= len {
            violation(format!("Enemy at {} is off a {len}-tile board", enemy.position));
        }
        if enemy.position == state.crown_pos && !state.game_over {
            violation(format!("Enemy stands on the crown at {} but the game goes on", enemy.position));
        }
    }

    for (index, tile) in state.world.iter() {
        // Walls are only ever raised to level 1.
        if tile.wall_level > 1 {
            violation(format!("Tile {index} has wall level {}", tile.wall_level));
        }
    }

    let farms = state.world.farm_count();
    if u32::try_from(farms).ok() != Some(state.farms_built) {
        violation(format!(
            "Board holds {farms} farms but {} were built",
            state.farms_built
        ));
    }

    let archers = state.world.archer_count();
    if u32::try_from(archers).map_or(true, |a| a > state.archers_trained) {
        violation(format!(
            "Board holds {archers} archers but only {} were trained",
            state.archers_trained
        ));
    }

    if state.day == 0 {
        violation("Day counter is zero".to_string());
    }

    violations
}
