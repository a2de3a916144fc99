//! Game layer for Kingdom.
//!
//! Implements the rules of the realm:
//! - A one-dimensional strip of tiles holding farms, walls and archers
//! - The Player / Build / Enemy / Income day cycle with its action budget
//! - Nightly spawn, march and defense resolution
//! - Objectives with one-shot rewards
//! - A pure reducer tying it all together

mod actions;
mod config;
mod engine;
mod invariants;
mod night;
mod objectives;
mod phase;
mod state;
mod world;

pub use actions::{apply_action, available_actions, check_action, Action, Rejection};
pub use config::{GameConfig, DEFAULT_ACTIONS_PER_PHASE, DEFAULT_BOARD_SIZE, DEFAULT_PHASE_DELAY};
pub use engine::{Command, Kingdom, Outcome, Step};
pub use invariants::{check_invariants, InvariantViolation};
pub use night::{resolve_night, roll_spawn, spawn_chance, Edge, NightReport};
pub use objectives::{
    Counter, Objective, ObjectiveBook, ObjectiveCatalog, ObjectiveDef, Reward, RewardKind,
};
pub use phase::advance;
pub use state::{Enemy, EventLog, GameState, Phase};
pub use world::{Building, Unit, World, WorldTile};
