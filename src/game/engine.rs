//! The game as a reducer: `(kingdom, command) -> kingdom`.
//!
//! [`Kingdom`] bundles the live [`GameState`] with its objectives and the
//! rules it is played under. [`Kingdom::apply`] never mutates; it returns a
//! new kingdom with every effect of the command applied, objectives
//! included, or an unchanged clone when the command does not apply.

use std::sync::Arc;

use tracing::debug;

use crate::error::ConfigError;
use crate::game::{
    actions, night, phase, Action, Edge, GameConfig, GameState, NightReport, ObjectiveBook,
    ObjectiveCatalog, Phase, Rejection,
};

/// Everything that can happen to a kingdom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A player action.
    Act(Action),
    /// Finish the Player or Build phase.
    EndPhase,
    /// Resolve the Enemy phase with a pre-rolled spawn.
    ResolveNight {
        /// Where tonight's enemy appears, if one does.
        spawn: Option<Edge>,
    },
    /// Resolve the Income phase and start the next day.
    CollectIncome,
    /// Log a line of flavor text.
    RecordTidings(String),
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command took effect.
    Applied,
    /// The Enemy phase resolved.
    Night(NightReport),
    /// A player command was refused; the state is unchanged.
    Rejected(Rejection),
    /// The command does not apply to the current phase; the state is unchanged.
    Ignored,
}

impl Outcome {
    /// Check if the command changed the kingdom.
    #[must_use]
    pub const fn changed(&self) -> bool {
        matches!(self, Outcome::Applied | Outcome::Night(_))
    }
}

/// Result of [`Kingdom::apply`].
#[derive(Debug, Clone)]
pub struct Step {
    /// The kingdom after the command.
    pub kingdom: Kingdom,
    /// What the command did.
    pub outcome: Outcome,
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Kingdom {
    config: Arc<GameConfig>,
    catalog: Arc<ObjectiveCatalog>,
    state: GameState,
    objectives: ObjectiveBook,
}

impl Default for Kingdom {
    fn default() -> Self {
        Self::opening(Arc::new(GameConfig::default()), Arc::new(ObjectiveCatalog::default()))
    }
}

impl Kingdom {
    /// Start a new game.
    ///
    /// # Errors
    ///
    /// Returns an error if the config does not describe a playable board.
    pub fn new(config: GameConfig, catalog: ObjectiveCatalog) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::opening(Arc::new(config), Arc::new(catalog)))
    }

    /// Resume from an arbitrary state, with a fresh objective book.
    ///
    /// # Errors
    ///
    /// Returns an error if the config does not describe a playable board, or
    /// if the state was built for a different board.
    pub fn from_state(
        config: GameConfig,
        catalog: ObjectiveCatalog,
        state: GameState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_state(&state)?;
        let objectives = catalog.book();
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            state,
            objectives,
        })
    }

    fn opening(config: Arc<GameConfig>, catalog: Arc<ObjectiveCatalog>) -> Self {
        let state = GameState::new(&config);
        let objectives = catalog.book();
        Self {
            config,
            catalog,
            state,
            objectives,
        }
        .settle()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Objectives and their completion.
    #[must_use]
    pub fn objectives(&self) -> &ObjectiveBook {
        &self.objectives
    }

    /// Rules this game is played under.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Check if the crown has fallen.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    /// A brand-new game under the same rules and catalog.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::opening(Arc::clone(&self.config), Arc::clone(&self.catalog))
    }

    /// Apply a command.
    #[must_use]
    pub fn apply(&self, command: &Command) -> Step {
        let config = &*self.config;
        let state = &self.state;

        let (next, outcome) = match command {
            Command::Act(action) => match actions::apply_action(state, *action, config) {
                Ok(next) => (next, Outcome::Applied),
                Err(rejection) => {
                    debug!(%action, %rejection, "action rejected");
                    return self.unchanged(Outcome::Rejected(rejection));
                }
            },
            Command::EndPhase => {
                if state.game_over {
                    return self.unchanged(Outcome::Rejected(Rejection::GameOver));
                }
                if !state.phase.is_player_driven() {
                    return self.unchanged(Outcome::Ignored);
                }
                match phase::advance(state, config) {
                    Some(next) => (next, Outcome::Applied),
                    None => return self.unchanged(Outcome::Ignored),
                }
            }
            Command::ResolveNight { spawn } => match night::resolve_night(state, *spawn, config) {
                Some((next, report)) => (next, Outcome::Night(report)),
                None => return self.unchanged(Outcome::Ignored),
            },
            Command::CollectIncome => {
                if state.phase != Phase::Income {
                    return self.unchanged(Outcome::Ignored);
                }
                match phase::advance(state, config) {
                    Some(next) => (next, Outcome::Applied),
                    None => return self.unchanged(Outcome::Ignored),
                }
            }
            Command::RecordTidings(text) => {
                if state.game_over {
                    return self.unchanged(Outcome::Ignored);
                }
                let mut next = state.clone();
                next.event_log.record(format!("Event: {text}"));
                (next, Outcome::Applied)
            }
        };

        let kingdom = Self {
            config: Arc::clone(&self.config),
            catalog: Arc::clone(&self.catalog),
            state: next,
            objectives: self.objectives.clone(),
        }
        .settle();

        Step { kingdom, outcome }
    }

    /// Apply a sequence of commands, keeping only the final kingdom.
    #[must_use]
    pub fn apply_all<'a>(&self, commands: impl IntoIterator<Item = &'a Command>) -> Self {
        commands
            .into_iter()
            .fold(self.clone(), |kingdom, command| kingdom.apply(command).kingdom)
    }

    fn unchanged(&self, outcome: Outcome) -> Step {
        Step {
            kingdom: self.clone(),
            outcome,
        }
    }

    /// Run objective evaluation to a fixed point.
    ///
    /// A reward can itself push a counter over another threshold (coins,
    /// peasants), so evaluation repeats until nothing new completes. Each
    /// pass completes at least one objective, so this terminates.
    fn settle(mut self) -> Self {
        while let Some((objectives, state)) = self.objectives.evaluate(&self.state) {
            self.objectives = objectives;
            self.state = state;
        }
        self
    }
}
