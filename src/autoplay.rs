//! Headless autoplay.
//!
//! Provides a pure function interface: `(seed, stance) -> GameResult`
//!
//! A [`Stance`] is a scripted monarch that picks one action at a time from
//! the current state, or ends the phase when it has nothing left to do. Spawn
//! rolls come from a seeded RNG, so the same seed and stance always produce
//! the same game.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

use crate::game::{
    check_action, roll_spawn, Action, Command, GameConfig, GameState, Kingdom, Phase,
};

/// Default day limit for a headless game.
pub const DEFAULT_MAX_DAYS: u32 = 100;

/// Farms the balanced stance builds before it turns to defense.
const BALANCED_FARM_TARGET: usize = 4;

/// A scripted way of playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// Never acts; ends every phase immediately.
    Idle,
    /// Spends everything on farms.
    Farmer,
    /// Guards the crown with walls and archers.
    Warden,
    /// Builds up some farms, then defends.
    Balanced,
}

impl Stance {
    /// Every stance.
    pub const ALL: [Stance; 4] = [Stance::Idle, Stance::Farmer, Stance::Warden, Stance::Balanced];

    /// Pick the next action, or `None` to end the phase.
    ///
    /// The returned action is always one the state accepts.
    #[must_use]
    pub fn choose(self, state: &GameState, config: &GameConfig) -> Option<Action> {
        if state.game_over || !state.phase.is_player_driven() || state.actions_left == 0 {
            return None;
        }

        let action = match self {
            Stance::Idle => None,
            Stance::Farmer => farmer(state, config),
            Stance::Warden => warden(state, config),
            Stance::Balanced => {
                if state.world.farm_count() < BALANCED_FARM_TARGET {
                    farmer(state, config).or_else(|| warden(state, config))
                } else {
                    warden(state, config)
                }
            }
        };

        action.filter(|&a| check_action(state, a, config).is_ok())
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stance::Idle => "idle",
            Stance::Farmer => "farmer",
            Stance::Warden => "warden",
            Stance::Balanced => "balanced",
        };
        f.write_str(name)
    }
}

fn legal(state: &GameState, action: Action, config: &GameConfig) -> bool {
    check_action(state, action, config).is_ok()
}

fn step_toward(state: &GameState, target: usize) -> Option<Action> {
    match target.cmp(&state.player_pos) {
        std::cmp::Ordering::Less => Some(Action::MoveLeft),
        std::cmp::Ordering::Greater => Some(Action::MoveRight),
        std::cmp::Ordering::Equal => None,
    }
}

/// Nearest tile to `from` matching `want`, ties going left.
fn nearest(state: &GameState, from: usize, want: impl Fn(usize) -> bool) -> Option<usize> {
    state
        .world
        .iter()
        .map(|(i, _)| i)
        .filter(|&i| want(i))
        .min_by_key(|&i| i.abs_diff(from))
}

fn farmer(state: &GameState, config: &GameConfig) -> Option<Action> {
    match state.phase {
        Phase::Build => legal(state, Action::BuildFarm, config).then_some(Action::BuildFarm),
        Phase::Player => {
            if state.coins < config.farm_cost {
                return None;
            }
            let target = nearest(state, state.player_pos, |i| {
                state.world.get(i).is_some_and(|t| t.building.is_none())
            })?;
            step_toward(state, target)
        }
        Phase::Enemy | Phase::Income => None,
    }
}

fn warden(state: &GameState, config: &GameConfig) -> Option<Action> {
    let crown = state.crown_pos;
    let here = state.player_pos;

    match state.phase {
        Phase::Build => {
            (here != crown && legal(state, Action::BuildWall, config)).then_some(Action::BuildWall)
        }
        Phase::Player => {
            let unguarded = |i: usize| {
                i != crown && state.world.get(i).is_some_and(|t| !t.has_archer())
            };
            if state.peasants > 0 && unguarded(here) {
                return Some(Action::TrainArcher);
            }
            if state.peasants == 0 && legal(state, Action::HirePeasant, config) {
                return Some(Action::HirePeasant);
            }
            let target = nearest(state, crown, |i| {
                i != crown
                    && state
                        .world
                        .get(i)
                        .is_some_and(|t| !t.has_archer() || t.wall_level == 0)
            })?;
            step_toward(state, target)
        }
        Phase::Enemy | Phase::Income => None,
    }
}

/// Limits for a headless game.
#[derive(Debug, Clone, Copy)]
pub struct AutoplayConfig {
    /// Stop once this day is reached.
    pub max_days: u32,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

/// Final result of a headless game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The seed used for this game.
    pub seed: u64,
    /// Stance that played.
    pub stance: Stance,
    /// Day the game ended on.
    pub final_day: u32,
    /// Whether the crown fell.
    pub fell: bool,
    /// Greed destroyed over the game.
    pub enemies_defeated: u32,
    /// Farms built, starting farms included.
    pub farms_built: u32,
    /// Walls raised.
    pub walls_built: u32,
    /// Archers trained.
    pub archers_trained: u32,
    /// Objectives completed.
    pub objectives_completed: usize,
    /// Coins in the treasury at the end.
    pub final_coins: u32,
}

impl GameResult {
    /// Summarize a finished kingdom.
    #[must_use]
    pub fn from_kingdom(seed: u64, stance: Stance, kingdom: &Kingdom) -> Self {
        let state = kingdom.state();
        Self {
            seed,
            stance,
            final_day: state.day,
            fell: state.game_over,
            enemies_defeated: state.enemies_defeated,
            farms_built: state.farms_built,
            walls_built: state.walls_built,
            archers_trained: state.archers_trained,
            objectives_completed: kingdom.objectives().completed_count(),
            final_coins: state.coins,
        }
    }
}

/// Run a complete game under the default rules.
///
/// # Determinism
///
/// Given the same seed, stance and config, this function always produces
/// the same `GameResult`.
#[must_use]
pub fn run_game(seed: u64, stance: Stance, config: &AutoplayConfig) -> GameResult {
    play_out(Kingdom::default(), seed, stance, config)
}

/// Play `kingdom` to game over or the day limit.
#[must_use]
pub fn play_out(kingdom: Kingdom, seed: u64, stance: Stance, config: &AutoplayConfig) -> GameResult {
    let kingdom = play_kingdom(kingdom, seed, stance, config);
    let result = GameResult::from_kingdom(seed, stance, &kingdom);
    debug!(
        seed,
        %stance,
        day = result.final_day,
        fell = result.fell,
        "game finished"
    );
    result
}

/// Like [`play_out`], returning the final kingdom instead of a summary.
#[must_use]
pub fn play_kingdom(
    mut kingdom: Kingdom,
    seed: u64,
    stance: Stance,
    config: &AutoplayConfig,
) -> Kingdom {
    let mut rng = StdRng::seed_from_u64(seed);

    while !kingdom.is_game_over() && kingdom.state().day < config.max_days {
        let state = kingdom.state();
        let command = match state.phase {
            Phase::Player | Phase::Build => match stance.choose(state, kingdom.config()) {
                Some(action) => Command::Act(action),
                None => Command::EndPhase,
            },
            Phase::Enemy => Command::ResolveNight {
                spawn: roll_spawn(state.day, kingdom.config(), &mut rng),
            },
            Phase::Income => Command::CollectIncome,
        };
        kingdom = kingdom.apply(&command).kingdom;
    }

    kingdom
}
