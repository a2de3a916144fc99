//! Game state snapshot.
//!
//! A [`GameState`] is treated as an immutable value: every rule in this crate
//! takes `&GameState` and hands back a new one. Nothing holds a live mutable
//! reference into the state consumers are looking at.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{GameConfig, World, WorldTile};

/// One of the four parts of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The monarch moves, hires peasants and trains archers.
    Player,
    /// The monarch raises walls and farms.
    Build,
    /// The Greed spawn and advance. Resolves on its own.
    Enemy,
    /// Farms pay out and a new day begins. Resolves on its own.
    Income,
}

impl Phase {
    /// The phase that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Phase::Player => Phase::Build,
            Phase::Build => Phase::Enemy,
            Phase::Enemy => Phase::Income,
            Phase::Income => Phase::Player,
        }
    }

    /// Check if the player acts during this phase.
    #[must_use]
    pub const fn is_player_driven(self) -> bool {
        matches!(self, Phase::Player | Phase::Build)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Player => "Player Phase",
            Phase::Build => "Build Phase",
            Phase::Enemy => "Enemy Phase",
            Phase::Income => "Income Phase",
        };
        f.write_str(name)
    }
}

/// A Greed marching on the crown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Tile the enemy stands on.
    pub position: usize,
    /// Remaining hit points.
    pub hit_points: u32,
}

impl Enemy {
    /// Create an enemy at `position`.
    #[must_use]
    pub const fn new(position: usize, hit_points: u32) -> Self {
        Self {
            position,
            hit_points,
        }
    }
}

/// Chronicle of the reign, newest entry first. Grows without bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    /// Prepend an entry.
    pub fn record(&mut self, message: impl Into<String>) {
        self.entries.push_front(message.into());
    }

    /// The newest entry.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if any entry contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.contains(needle))
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current day, starting at 1.
    pub day: u32,
    /// Treasury.
    pub coins: u32,
    /// Idle peasants available for training.
    pub peasants: u32,
    /// Current phase.
    pub phase: Phase,
    /// Tile the monarch stands on.
    pub player_pos: usize,
    /// Tile holding the crown.
    pub crown_pos: usize,
    /// Actions remaining in the current phase.
    pub actions_left: u32,
    /// Extra actions earned outside an action phase, paid at the next reset.
    pub bonus_actions: u32,
    /// The strip of land.
    pub world: World,
    /// Enemies alive on the board.
    pub enemies: Vec<Enemy>,
    /// Enemies destroyed so far.
    pub enemies_defeated: u32,
    /// Coins collected from farms so far.
    pub coins_earned: u32,
    /// Farms standing, including the ones granted at the start.
    pub farms_built: u32,
    /// Walls raised so far.
    pub walls_built: u32,
    /// Peasants hired so far.
    pub peasants_recruited: u32,
    /// Archers trained so far.
    pub archers_trained: u32,
    /// Set once a Greed reaches the crown. Freezes the phase cycle.
    pub game_over: bool,
    /// Chronicle of the reign, newest first.
    pub event_log: EventLog,
}

impl GameState {
    /// Create the opening state for a config.
    ///
    /// The config should already be validated.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let mut world = World::new(config.board_size);
        for &farm in &config.starting_farms {
            world.set(farm, WorldTile::farm());
        }
        let farms_built = u32::try_from(world.farm_count()).unwrap_or(u32::MAX);

        let mut event_log = EventLog::default();
        event_log.record("Your reign begins. Protect the crown!");

        Self {
            day: 1,
            coins: config.starting_coins,
            peasants: config.starting_peasants,
            phase: Phase::Player,
            player_pos: config.player_start,
            crown_pos: config.crown_pos,
            actions_left: config.actions_per_phase,
            bonus_actions: 0,
            world,
            enemies: Vec::new(),
            enemies_defeated: 0,
            coins_earned: 0,
            farms_built,
            walls_built: 0,
            peasants_recruited: 0,
            archers_trained: 0,
            game_over: false,
            event_log,
        }
    }

    /// The tile the monarch stands on.
    #[must_use]
    pub fn current_tile(&self) -> Option<&WorldTile> {
        self.world.get(self.player_pos)
    }

    /// Coins the farms will yield at the next Income phase.
    #[must_use]
    pub fn projected_income(&self, config: &GameConfig) -> u32 {
        let farms = u32::try_from(self.world.farm_count()).unwrap_or(u32::MAX);
        farms.saturating_mul(config.farm_income)
    }

    /// Refill the action budget, paying out any held bonus actions.
    pub(crate) fn reset_actions(&mut self, config: &GameConfig) {
        self.actions_left = config.actions_per_phase.saturating_add(self.bonus_actions);
        self.bonus_actions = 0;
    }
}
