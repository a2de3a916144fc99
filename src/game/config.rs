//! Game constants.
//!
//! The shipped game always runs with [`GameConfig::default`]. The struct
//! exists so tests and tools can build smaller or tilted boards.

use std::time::Duration;

use crate::error::ConfigError;
use crate::game::GameState;

/// Default number of tiles on the strip.
pub const DEFAULT_BOARD_SIZE: usize = 20;

/// Default actions granted at the start of the Player and Build phases.
pub const DEFAULT_ACTIONS_PER_PHASE: u32 = 2;

/// Default delay before the Enemy and Income phases resolve.
pub const DEFAULT_PHASE_DELAY: Duration = Duration::from_millis(1500);

/// Fixed rules of a game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Number of tiles on the strip.
    pub board_size: usize,
    /// Coins at the start of the game.
    pub starting_coins: u32,
    /// Peasants at the start of the game.
    pub starting_peasants: u32,
    /// Tiles that start with a farm.
    pub starting_farms: Vec<usize>,
    /// Tile the monarch starts on.
    pub player_start: usize,
    /// Tile holding the crown.
    pub crown_pos: usize,
    /// Actions granted at each budget reset.
    pub actions_per_phase: u32,
    /// Coins each farm yields per day.
    pub farm_income: u32,
    /// Coins to hire one peasant.
    pub peasant_cost: u32,
    /// Coins to raise a wall.
    pub wall_cost: u32,
    /// Coins to build a farm.
    pub farm_cost: u32,
    /// Spawn chance on day zero.
    pub spawn_base_chance: f64,
    /// Spawn chance added per day.
    pub spawn_chance_per_day: f64,
    /// Hit points of a freshly spawned enemy.
    pub enemy_hit_points: u32,
    /// Pacing delay before the Enemy and Income phases resolve.
    pub phase_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            starting_coins: 10,
            starting_peasants: 0,
            starting_farms: vec![2, 8],
            player_start: 10,
            crown_pos: 10,
            actions_per_phase: DEFAULT_ACTIONS_PER_PHASE,
            farm_income: 2,
            peasant_cost: 3,
            wall_cost: 5,
            farm_cost: 10,
            spawn_base_chance: 0.5,
            spawn_chance_per_day: 0.05,
            enemy_hit_points: 1,
            phase_delay: DEFAULT_PHASE_DELAY,
        }
    }
}

impl GameConfig {
    /// Index of the last tile.
    #[must_use]
    pub const fn last_tile(&self) -> usize {
        self.board_size.saturating_sub(1)
    }

    /// Check the config describes a playable board.
    ///
    /// # Errors
    ///
    /// Returns the first rule the config breaks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 3 {
            return Err(ConfigError::BoardTooSmall(self.board_size));
        }
        // Enemies spawn on the edges, so the crown must sit strictly inside.
        if self.crown_pos == 0 || self.crown_pos >= self.last_tile() {
            return Err(ConfigError::CrownPlacement {
                crown: self.crown_pos,
                board_size: self.board_size,
            });
        }
        if self.player_start >= self.board_size {
            return Err(ConfigError::TileOutOfRange {
                what: "player start",
                index: self.player_start,
                board_size: self.board_size,
            });
        }
        if let Some(&farm) = self.starting_farms.iter().find(|&&f| f >= self.board_size) {
            return Err(ConfigError::TileOutOfRange {
                what: "starting farm",
                index: farm,
                board_size: self.board_size,
            });
        }
        if self.actions_per_phase == 0 {
            return Err(ConfigError::NoActions);
        }
        for (name, value) in [
            ("spawn_base_chance", self.spawn_base_chance),
            ("spawn_chance_per_day", self.spawn_chance_per_day),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::SpawnChance { name, value });
            }
        }
        Ok(())
    }

    /// Check a restored state lives on the board this config describes.
    ///
    /// Only the geometry is checked. Counters are left to
    /// [`check_invariants`](crate::game::check_invariants).
    ///
    /// # Errors
    ///
    /// Returns the first mismatch between the state and the board.
    pub fn check_state(&self, state: &GameState) -> Result<(), ConfigError> {
        if state.world.len() != self.board_size {
            return Err(ConfigError::StateMismatch {
                what: "board length",
                expected: self.board_size,
                found: state.world.len(),
            });
        }
        if state.crown_pos != self.crown_pos {
            return Err(ConfigError::StateMismatch {
                what: "crown tile",
                expected: self.crown_pos,
                found: state.crown_pos,
            });
        }
        if state.player_pos >= self.board_size {
            return Err(ConfigError::TileOutOfRange {
                what: "player",
                index: state.player_pos,
                board_size: self.board_size,
            });
        }
        if let Some(enemy) = state.enemies.iter().find(|e| e.position >= self.board_size) {
            return Err(ConfigError::TileOutOfRange {
                what: "enemy",
                index: enemy.position,
                board_size: self.board_size,
            });
        }
        Ok(())
    }
}
