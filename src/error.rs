//! Error types for building a game.
//!
//! Invalid player actions are not errors; see [`crate::game::Rejection`].

use thiserror::Error;

/// A [`GameConfig`](crate::game::GameConfig) that cannot describe a playable board.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// The strip is too short to hold two edges and a crown between them.
    #[error("board of {0} tiles is too small (minimum 3)")]
    BoardTooSmall(usize),
    /// The crown sits on an edge tile or off the board.
    #[error("crown at tile {crown} must lie strictly inside a board of {board_size} tiles")]
    CrownPlacement {
        /// Configured crown index.
        crown: usize,
        /// Configured board size.
        board_size: usize,
    },
    /// A configured tile index lies off the board.
    #[error("{what} at tile {index} is outside a board of {board_size} tiles")]
    TileOutOfRange {
        /// Which setting was out of range.
        what: &'static str,
        /// The offending index.
        index: usize,
        /// Configured board size.
        board_size: usize,
    },
    /// Zero actions per phase would leave the player unable to act.
    #[error("actions per phase must be at least 1")]
    NoActions,
    /// A spawn chance is negative or not a number.
    #[error("{name} must be a finite, non-negative number (got {value})")]
    SpawnChance {
        /// Setting name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// A restored state does not fit the board its config describes.
    #[error("state {what} is {found}, but the config expects {expected}")]
    StateMismatch {
        /// Which part of the state disagrees.
        what: &'static str,
        /// Value the config implies.
        expected: usize,
        /// Value found in the state.
        found: usize,
    },
}

/// A malformed objective catalog. Fatal to initialization.
#[derive(Debug, Error)]
pub enum ObjectiveConfigError {
    /// The target does not name any game state field.
    #[error("objective {id:?} targets unknown field {field:?}")]
    UnknownField {
        /// Objective id.
        id: String,
        /// Field name as written in the catalog.
        field: String,
    },
    /// The target names a field that is not a number.
    #[error("objective {id:?} targets non-numeric field {field:?}")]
    NonNumericField {
        /// Objective id.
        id: String,
        /// Field name as written in the catalog.
        field: String,
    },
    /// Two catalog entries share an id.
    #[error("duplicate objective id {0:?}")]
    DuplicateId(String),
    /// The catalog is not valid JSON for the expected shape.
    #[error("failed to parse objective catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
