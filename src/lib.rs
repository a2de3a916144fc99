// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Kingdom: a single-player, turn-based kingdom-defense game.
//!
//! The player spends a small per-phase action budget on a one-dimensional
//! strip of tiles, building farms, walls and archers, while the Greed march
//! on the crown each night.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / TUI        Autoplay         │
//! ├─────────────────────────────────────┤
//! │   Session (pacing, chronicle)       │
//! ├─────────────────────────────────────┤
//! │   Game reducer (Kingdom::apply)     │
//! └─────────────────────────────────────┘
//! ```
//!
//! The reducer is pure: every command yields a fresh [`GameState`]
//! snapshot. Randomness (spawn rolls) and wall-clock pacing live above it.

pub mod autoplay;
pub mod chronicle;
pub mod error;
pub mod game;
pub mod session;

pub use error::{ConfigError, ObjectiveConfigError};

// Re-export key game types at crate root for convenience
pub use game::{Action, Command, GameConfig, GameState, Kingdom, ObjectiveCatalog, Outcome, Phase};
pub use session::Session;
