//! Objectives: one-shot goals tracked against numeric state counters.
//!
//! A catalog names its targets by field name so it can be written by hand
//! or loaded from JSON. Names are resolved to a [`Counter`] when the catalog
//! is built, so evaluation never looks a field up by string.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ObjectiveConfigError;
use crate::game::{GameState, Phase};

/// A numeric field of [`GameState`] an objective can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    /// Current day.
    Day,
    /// Treasury.
    Coins,
    /// Idle peasants.
    Peasants,
    /// Enemies destroyed.
    EnemiesDefeated,
    /// Coins collected from farms.
    CoinsEarned,
    /// Farms standing.
    FarmsBuilt,
    /// Walls raised.
    WallsBuilt,
    /// Peasants hired.
    PeasantsRecruited,
    /// Archers trained.
    ArchersTrained,
}

/// Field names accepted in catalogs, in snake and camel case.
const COUNTER_NAMES: [(&str, &str, Counter); 9] = [
    ("day", "day", Counter::Day),
    ("coins", "coins", Counter::Coins),
    ("peasants", "peasants", Counter::Peasants),
    ("enemies_defeated", "enemiesDefeated", Counter::EnemiesDefeated),
    ("coins_earned", "coinsEarned", Counter::CoinsEarned),
    ("farms_built", "farmsBuilt", Counter::FarmsBuilt),
    ("walls_built", "wallsBuilt", Counter::WallsBuilt),
    ("peasants_recruited", "peasantsRecruited", Counter::PeasantsRecruited),
    ("archers_trained", "archersTrained", Counter::ArchersTrained),
];

/// State fields that exist but hold no number.
const NON_NUMERIC_FIELDS: [&str; 8] = [
    "phase",
    "world",
    "enemies",
    "event_log",
    "eventLog",
    "game_over",
    "gameOver",
    "garrison",
];

impl Counter {
    /// Every counter, in declaration order.
    pub const ALL: [Counter; 9] = [
        Counter::Day,
        Counter::Coins,
        Counter::Peasants,
        Counter::EnemiesDefeated,
        Counter::CoinsEarned,
        Counter::FarmsBuilt,
        Counter::WallsBuilt,
        Counter::PeasantsRecruited,
        Counter::ArchersTrained,
    ];

    /// Canonical field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Counter::Day => "day",
            Counter::Coins => "coins",
            Counter::Peasants => "peasants",
            Counter::EnemiesDefeated => "enemies_defeated",
            Counter::CoinsEarned => "coins_earned",
            Counter::FarmsBuilt => "farms_built",
            Counter::WallsBuilt => "walls_built",
            Counter::PeasantsRecruited => "peasants_recruited",
            Counter::ArchersTrained => "archers_trained",
        }
    }

    /// Resolve a field name written in snake or camel case.
    #[must_use]
    pub fn lookup(field: &str) -> Option<Self> {
        COUNTER_NAMES
            .iter()
            .find(|(snake, camel, _)| *snake == field || *camel == field)
            .map(|(_, _, counter)| *counter)
    }

    /// Current value of this counter.
    #[must_use]
    pub fn read(self, state: &GameState) -> u32 {
        match self {
            Counter::Day => state.day,
            Counter::Coins => state.coins,
            Counter::Peasants => state.peasants,
            Counter::EnemiesDefeated => state.enemies_defeated,
            Counter::CoinsEarned => state.coins_earned,
            Counter::FarmsBuilt => state.farms_built,
            Counter::WallsBuilt => state.walls_built,
            Counter::PeasantsRecruited => state.peasants_recruited,
            Counter::ArchersTrained => state.archers_trained,
        }
    }
}

/// What an objective pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Coins into the treasury.
    Coins,
    /// Idle peasants.
    Peasants,
    /// Extra actions in the current or next action phase.
    ExtraActions,
}

/// A reward paid once when an objective completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// What is paid.
    pub kind: RewardKind,
    /// How much.
    pub amount: u32,
}

impl Reward {
    /// A coin reward.
    #[must_use]
    pub const fn coins(amount: u32) -> Self {
        Self {
            kind: RewardKind::Coins,
            amount,
        }
    }
}

/// A catalog entry as written by hand, before its target is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveDef {
    /// Unique id.
    pub id: String,
    /// Text shown to the player.
    pub description: String,
    /// Name of the watched state field.
    pub target: String,
    /// Threshold that completes the objective.
    pub value: u32,
    /// Reward paid on completion.
    pub reward: Reward,
}

/// A tracked objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Objective {
    /// Unique id.
    pub id: String,
    /// Text shown to the player.
    pub description: String,
    /// Watched counter.
    pub counter: Counter,
    /// Threshold that completes the objective.
    pub target_value: u32,
    /// Reward paid on completion.
    pub reward: Reward,
    /// Flips to `true` once and never back.
    pub completed: bool,
}

impl Objective {
    /// Create an incomplete objective.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        counter: Counter,
        target_value: u32,
        reward: Reward,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            counter,
            target_value,
            reward,
            completed: false,
        }
    }

    /// Check if the state meets this objective's threshold.
    #[must_use]
    pub fn is_met(&self, state: &GameState) -> bool {
        self.counter.read(state) >= self.target_value
    }

    fn from_def(def: ObjectiveDef) -> Result<Self, ObjectiveConfigError> {
        let Some(counter) = Counter::lookup(&def.target) else {
            return Err(if NON_NUMERIC_FIELDS.contains(&def.target.as_str()) {
                ObjectiveConfigError::NonNumericField {
                    id: def.id,
                    field: def.target,
                }
            } else {
                ObjectiveConfigError::UnknownField {
                    id: def.id,
                    field: def.target,
                }
            });
        };
        Ok(Self::new(def.id, def.description, counter, def.value, def.reward))
    }
}

/// A validated set of objectives to start a game with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveCatalog {
    entries: Vec<Objective>,
}

impl ObjectiveCatalog {
    /// Build a catalog from hand-written entries.
    ///
    /// # Errors
    ///
    /// Fails on the first entry whose target is not a monitorable counter,
    /// or on a repeated id.
    pub fn new(defs: Vec<ObjectiveDef>) -> Result<Self, ObjectiveConfigError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(defs.len());
        for def in defs {
            if !seen.insert(def.id.clone()) {
                return Err(ObjectiveConfigError::DuplicateId(def.id));
            }
            entries.push(Objective::from_def(def)?);
        }
        Ok(Self { entries })
    }

    /// Parse and validate a JSON array of [`ObjectiveDef`].
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or any entry [`ObjectiveCatalog::new`] rejects.
    pub fn from_json(json: &str) -> Result<Self, ObjectiveConfigError> {
        let defs: Vec<ObjectiveDef> = serde_json::from_str(json)?;
        Self::new(defs)
    }

    /// The entries, all incomplete.
    #[must_use]
    pub fn entries(&self) -> &[Objective] {
        &self.entries
    }

    /// A fresh book with nothing completed.
    #[must_use]
    pub fn book(&self) -> ObjectiveBook {
        ObjectiveBook {
            objectives: self.entries.clone(),
        }
    }
}

impl Default for ObjectiveCatalog {
    fn default() -> Self {
        let entries = vec![
            Objective::new("build_farm_1", "Build 3 farms.", Counter::FarmsBuilt, 3, Reward::coins(5)),
            Objective::new("build_wall_1", "Build a wall.", Counter::WallsBuilt, 1, Reward::coins(5)),
            Objective::new(
                "recruit_peasant_1",
                "Recruit 1 peasant.",
                Counter::PeasantsRecruited,
                1,
                Reward::coins(5),
            ),
            Objective::new(
                "train_archer_1",
                "Train an archer.",
                Counter::ArchersTrained,
                1,
                Reward::coins(10),
            ),
            Objective::new("survive_3_days", "Survive 3 days.", Counter::Day, 3, Reward::coins(10)),
            Objective::new(
                "defeat_1_greed",
                "Defeat 1 Greed.",
                Counter::EnemiesDefeated,
                1,
                Reward::coins(5),
            ),
        ];
        Self { entries }
    }
}

/// Objectives in play and their completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ObjectiveBook {
    objectives: Vec<Objective>,
}

impl ObjectiveBook {
    /// Iterate over objectives in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter()
    }

    /// Number of objectives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// Check if the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// Find an objective by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    /// Number of completed objectives.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }

    /// Complete every objective the state now meets and pay the rewards.
    ///
    /// Returns `None` when nothing new completed, so evaluating twice
    /// against the same state never pays twice. Rewards are summed by kind
    /// and applied to the state in one step.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> Option<(ObjectiveBook, GameState)> {
        if !self.objectives.iter().any(|o| !o.completed && o.is_met(state)) {
            return None;
        }

        let mut book = self.clone();
        let mut next = state.clone();
        let (mut coins, mut peasants, mut actions) = (0u32, 0u32, 0u32);

        for objective in &mut book.objectives {
            if objective.completed || !objective.is_met(state) {
                continue;
            }
            objective.completed = true;
            next.event_log
                .record(format!("Objective complete: {}", objective.description));
            let total = match objective.reward.kind {
                RewardKind::Coins => &mut coins,
                RewardKind::Peasants => &mut peasants,
                RewardKind::ExtraActions => &mut actions,
            };
            *total = total.saturating_add(objective.reward.amount);
        }

        next.coins = next.coins.saturating_add(coins);
        next.peasants = next.peasants.saturating_add(peasants);
        if matches!(next.phase, Phase::Player | Phase::Build) {
            next.actions_left = next.actions_left.saturating_add(actions);
        } else {
            next.bonus_actions = next.bonus_actions.saturating_add(actions);
        }

        Some((book, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    fn def(id: &str, target: &str, value: u32, reward: Reward) -> ObjectiveDef {
        ObjectiveDef {
            id: id.to_string(),
            description: format!("{id} description"),
            target: target.to_string(),
            value,
            reward,
        }
    }

    #[test]
    fn test_lookup_accepts_both_cases() {
        assert_eq!(Counter::lookup("farms_built"), Some(Counter::FarmsBuilt));
        assert_eq!(Counter::lookup("farmsBuilt"), Some(Counter::FarmsBuilt));
        assert_eq!(Counter::lookup("day"), Some(Counter::Day));
        assert_eq!(Counter::lookup("gold"), None);
        for counter in Counter::ALL {
            assert_eq!(Counter::lookup(counter.name()), Some(counter));
        }
    }

    #[test]
    fn test_catalog_rejects_unknown_field() {
        let result = ObjectiveCatalog::new(vec![def("a", "gold", 1, Reward::coins(1))]);
        assert!(matches!(
            result,
            Err(ObjectiveConfigError::UnknownField { ref field, .. }) if field == "gold"
        ));
    }

    #[test]
    fn test_catalog_rejects_non_numeric_field() {
        let result = ObjectiveCatalog::new(vec![def("a", "phase", 1, Reward::coins(1))]);
        assert!(matches!(result, Err(ObjectiveConfigError::NonNumericField { .. })));
    }

    #[test]
    fn test_catalog_rejects_duplicate_id() {
        let result = ObjectiveCatalog::new(vec![
            def("a", "day", 2, Reward::coins(1)),
            def("a", "coins", 2, Reward::coins(1)),
        ]);
        assert!(matches!(result, Err(ObjectiveConfigError::DuplicateId(ref id)) if id == "a"));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"id": "rich", "description": "Hoard 50 coins.", "target": "coins", "value": 50,
             "reward": {"kind": "peasants", "amount": 2}},
            {"id": "busy", "description": "Train 2 archers.", "target": "archersTrained", "value": 2,
             "reward": {"kind": "extra_actions", "amount": 1}}
        ]"#;
        let catalog = ObjectiveCatalog::from_json(json).unwrap();
        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.entries()[1].counter, Counter::ArchersTrained);
        assert_eq!(catalog.entries()[1].reward.kind, RewardKind::ExtraActions);
    }

    #[test]
    fn test_catalog_from_bad_json() {
        assert!(matches!(
            ObjectiveCatalog::from_json("{not json"),
            Err(ObjectiveConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_default_catalog() {
        let book = ObjectiveCatalog::default().book();
        assert_eq!(book.len(), 6);
        assert_eq!(book.completed_count(), 0);
        assert_eq!(book.get("survive_3_days").unwrap().counter, Counter::Day);
    }

    #[test]
    fn test_evaluate_completes_and_pays_once() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.walls_built = 1;
        let book = ObjectiveCatalog::default().book();

        let (book, state) = book.evaluate(&state).unwrap();
        assert!(book.get("build_wall_1").unwrap().completed);
        assert_eq!(state.coins, 15);
        assert_eq!(state.event_log.latest(), Some("Objective complete: Build a wall."));

        // Same state again: nothing new.
        assert!(book.evaluate(&state).is_none());
    }

    #[test]
    fn test_evaluate_sums_rewards_in_one_batch() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.walls_built = 1;
        state.peasants_recruited = 1;
        state.archers_trained = 1;

        let (book, state) = ObjectiveCatalog::default().book().evaluate(&state).unwrap();
        assert_eq!(book.completed_count(), 3);
        assert_eq!(state.coins, 10 + 5 + 5 + 10);
    }

    #[test]
    fn test_completed_never_reverts() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.coins = 50;
        let catalog =
            ObjectiveCatalog::new(vec![def("rich", "coins", 40, Reward::coins(1))]).unwrap();

        let (book, mut state) = catalog.book().evaluate(&state).unwrap();
        state.coins = 0;
        assert!(book.evaluate(&state).is_none());
        assert!(book.get("rich").unwrap().completed);
    }

    #[test]
    fn test_extra_actions_held_outside_action_phases() {
        let config = GameConfig::default();
        let catalog = ObjectiveCatalog::new(vec![def(
            "dawn",
            "day",
            1,
            Reward {
                kind: RewardKind::ExtraActions,
                amount: 2,
            },
        )])
        .unwrap();

        let mut state = GameState::new(&config);
        let (_, paid) = catalog.book().evaluate(&state).unwrap();
        assert_eq!(paid.actions_left, 4);
        assert_eq!(paid.bonus_actions, 0);

        state.phase = Phase::Income;
        let (_, held) = catalog.book().evaluate(&state).unwrap();
        assert_eq!(held.actions_left, 2);
        assert_eq!(held.bonus_actions, 2);
    }
}
