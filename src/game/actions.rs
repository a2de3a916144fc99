//! Player actions.
//!
//! Each action costs one point of the phase's action budget. An action that
//! is not allowed leaves the state untouched and reports a [`Rejection`];
//! this is ordinary play, not a fault.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Building, GameConfig, GameState, Phase, Unit};

/// Something the monarch can do with one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step one tile left.
    MoveLeft,
    /// Step one tile right.
    MoveRight,
    /// Spend coins on a peasant.
    HirePeasant,
    /// Turn a peasant into an archer on the current tile.
    TrainArcher,
    /// Raise a wall on the current tile.
    BuildWall,
    /// Build a farm on the current tile.
    BuildFarm,
}

impl Action {
    /// Every action, Player-phase actions first.
    pub const ALL: [Action; 6] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::HirePeasant,
        Action::TrainArcher,
        Action::BuildWall,
        Action::BuildFarm,
    ];

    /// The only phase in which this action is allowed.
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Action::MoveLeft | Action::MoveRight | Action::HirePeasant | Action::TrainArcher => {
                Phase::Player
            }
            Action::BuildWall | Action::BuildFarm => Phase::Build,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::MoveLeft => "Move Left",
            Action::MoveRight => "Move Right",
            Action::HirePeasant => "Hire Peasant",
            Action::TrainArcher => "Train Archer",
            Action::BuildWall => "Build Wall",
            Action::BuildFarm => "Build Farm",
        };
        f.write_str(label)
    }
}

/// Why an action was not carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The kingdom has fallen.
    GameOver,
    /// The action belongs to another phase.
    WrongPhase {
        /// Phase the action needs.
        required: Phase,
        /// Phase the game is in.
        current: Phase,
    },
    /// The budget for this phase is spent.
    NoActionsLeft,
    /// The move would leave the strip.
    OutOfBounds,
    /// Not enough coins.
    InsufficientCoins {
        /// Price of the action.
        needed: u32,
        /// Coins in the treasury.
        available: u32,
    },
    /// No idle peasant to train.
    NoPeasants,
    /// The tile already has a wall.
    WallPresent,
    /// The tile already has a building.
    TileOccupied,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::GameOver => write!(f, "the kingdom has fallen"),
            Rejection::WrongPhase { required, current } => {
                write!(f, "only allowed in the {required}, not the {current}")
            }
            Rejection::NoActionsLeft => write!(f, "no actions left this phase"),
            Rejection::OutOfBounds => write!(f, "cannot move past the edge of the realm"),
            Rejection::InsufficientCoins { needed, available } => {
                write!(f, "needs {needed} coins, have {available}")
            }
            Rejection::NoPeasants => write!(f, "no peasants to train"),
            Rejection::WallPresent => write!(f, "a wall already stands here"),
            Rejection::TileOccupied => write!(f, "this tile is already built on"),
        }
    }
}

/// Check whether `action` would be accepted, without applying it.
///
/// # Errors
///
/// Returns the first rule the action breaks.
pub fn check_action(state: &GameState, action: Action, config: &GameConfig) -> Result<(), Rejection> {
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    if state.phase != action.phase() {
        return Err(Rejection::WrongPhase {
            required: action.phase(),
            current: state.phase,
        });
    }
    if state.actions_left == 0 {
        return Err(Rejection::NoActionsLeft);
    }

    let afford = |needed: u32| {
        if state.coins >= needed {
            Ok(())
        } else {
            Err(Rejection::InsufficientCoins {
                needed,
                available: state.coins,
            })
        }
    };

    match action {
        Action::MoveLeft if state.player_pos == 0 => Err(Rejection::OutOfBounds),
        Action::MoveRight if state.player_pos + 1 >= state.world.len() => {
            Err(Rejection::OutOfBounds)
        }
        Action::MoveLeft | Action::MoveRight => Ok(()),
        Action::HirePeasant => afford(config.peasant_cost),
        Action::TrainArcher if state.peasants == 0 => Err(Rejection::NoPeasants),
        Action::TrainArcher => state.current_tile().map(|_| ()).ok_or(Rejection::OutOfBounds),
        Action::BuildWall => {
            let tile = state.current_tile().ok_or(Rejection::OutOfBounds)?;
            if tile.wall_level > 0 {
                return Err(Rejection::WallPresent);
            }
            afford(config.wall_cost)
        }
        Action::BuildFarm => {
            let tile = state.current_tile().ok_or(Rejection::OutOfBounds)?;
            if tile.building.is_some() {
                return Err(Rejection::TileOccupied);
            }
            afford(config.farm_cost)
        }
    }
}

/// Apply an action, producing the next state.
///
/// # Errors
///
/// Returns why the action was refused; the caller keeps its current state.
pub fn apply_action(
    state: &GameState,
    action: Action,
    config: &GameConfig,
) -> Result<GameState, Rejection> {
    check_action(state, action, config)?;

    let mut next = state.clone();
    next.actions_left -= 1;
    let pos = next.player_pos;

    match action {
        Action::MoveLeft | Action::MoveRight => {
            next.player_pos = if action == Action::MoveLeft { pos - 1 } else { pos + 1 };
            next.event_log
                .record(format!("You moved to tile {}.", next.player_pos + 1));
        }
        Action::HirePeasant => {
            next.coins -= config.peasant_cost;
            next.peasants += 1;
            next.peasants_recruited += 1;
            next.event_log.record("You hired a peasant.");
        }
        Action::TrainArcher => {
            next.peasants -= 1;
            if let Some(tile) = next.world.get_mut(pos) {
                tile.garrison.push(Unit::Archer);
            }
            next.archers_trained += 1;
            next.event_log.record("A peasant has taken up the bow!");
        }
        Action::BuildWall => {
            next.coins -= config.wall_cost;
            if let Some(tile) = next.world.get_mut(pos) {
                tile.wall_level = 1;
            }
            next.walls_built += 1;
            next.event_log.record("A sturdy wall has been raised.");
        }
        Action::BuildFarm => {
            next.coins -= config.farm_cost;
            if let Some(tile) = next.world.get_mut(pos) {
                tile.building = Some(Building::Farm);
            }
            next.farms_built += 1;
            next.event_log
                .record("A farm is built, ready to provide for the kingdom.");
        }
    }

    Ok(next)
}

/// Actions that would currently be accepted.
#[must_use]
pub fn available_actions(state: &GameState, config: &GameConfig) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&a| check_action(state, a, config).is_ok())
        .collect()
}
