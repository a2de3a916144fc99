//! Property-based tests for game mechanics.
//!
//! These tests drive random command sequences through the reducer and check
//! the rules that must hold for every reachable state.
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use kingdom::game::{
    apply_action, check_action, check_invariants, resolve_night, Action, Command, Edge, Enemy,
    GameConfig, GameState, Kingdom, Phase, Unit,
};

fn action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

fn edge() -> impl Strategy<Value = Option<Edge>> {
    prop_oneof![Just(None), Just(Some(Edge::Left)), Just(Some(Edge::Right))]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        6 => action().prop_map(Command::Act),
        2 => Just(Command::EndPhase),
        1 => edge().prop_map(|spawn| Command::ResolveNight { spawn }),
        1 => Just(Command::CollectIncome),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Every state reached by any command sequence satisfies the invariants.
    #[test]
    fn prop_invariants_hold(commands in prop::collection::vec(command(), 0..120)) {
        let mut kingdom = Kingdom::default();
        for command in &commands {
            kingdom = kingdom.apply(command).kingdom;
            let violations = check_invariants(kingdom.state(), kingdom.config());
            prop_assert!(violations.is_empty(), "{:?} after {:?}", violations, command);
        }
    }

    /// A rejected or ignored command leaves the state untouched.
    #[test]
    fn prop_refused_commands_are_noops(
        setup in prop::collection::vec(command(), 0..40),
        probe in command()
    ) {
        let kingdom = Kingdom::default().apply_all(&setup);
        let step = kingdom.apply(&probe);
        if !step.outcome.changed() {
            prop_assert_eq!(step.kingdom.state(), kingdom.state());
            prop_assert_eq!(step.kingdom.objectives(), kingdom.objectives());
        }
    }

    /// Actions never overdraw coins, peasants or the budget.
    #[test]
    fn prop_actions_never_overdraw(
        coins in 0u32..30,
        peasants in 0u32..3,
        actions_left in 0u32..3,
        build in any::<bool>(),
        chosen in action()
    ) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.coins = coins;
        state.peasants = peasants;
        state.actions_left = actions_left;
        state.phase = if build { Phase::Build } else { Phase::Player };

        let accepted = check_action(&state, chosen, &config).is_ok();
        match apply_action(&state, chosen, &config) {
            Ok(next) => {
                prop_assert!(accepted);
                prop_assert!(next.coins <= state.coins);
                prop_assert!(next.peasants <= state.peasants + 1);
                prop_assert_eq!(next.actions_left, state.actions_left - 1);
            }
            Err(_) => prop_assert!(!accepted),
        }
    }

    /// Without a fall, a full day returns to the Player phase one day later.
    #[test]
    fn prop_phase_cycle(
        player_actions in prop::collection::vec(action(), 0..4),
        build_actions in prop::collection::vec(action(), 0..4),
        spawn in edge()
    ) {
        let start = Kingdom::default();
        let mut kingdom = start.clone();
        for a in &player_actions {
            kingdom = kingdom.apply(&Command::Act(*a)).kingdom;
        }
        kingdom = kingdom.apply(&Command::EndPhase).kingdom;
        for a in &build_actions {
            kingdom = kingdom.apply(&Command::Act(*a)).kingdom;
        }
        kingdom = kingdom.apply_all(&[
            Command::EndPhase,
            Command::ResolveNight { spawn },
            Command::CollectIncome,
        ]);

        let state = kingdom.state();
        prop_assert!(!state.game_over);
        prop_assert_eq!(state.day, start.state().day + 1);
        prop_assert_eq!(state.phase, Phase::Player);
        prop_assert_eq!(state.actions_left, kingdom.config().actions_per_phase);
    }

    /// Completed objectives stay completed.
    #[test]
    fn prop_objectives_monotonic(commands in prop::collection::vec(command(), 0..120)) {
        let mut kingdom = Kingdom::default();
        for command in &commands {
            let next = kingdom.apply(command).kingdom;
            for (before, after) in kingdom.objectives().iter().zip(next.objectives().iter()) {
                prop_assert!(!before.completed || after.completed);
            }
            kingdom = next;
        }
    }

    /// Re-evaluating a settled book never pays twice.
    #[test]
    fn prop_evaluation_idempotent(commands in prop::collection::vec(command(), 0..60)) {
        let kingdom = Kingdom::default().apply_all(&commands);
        prop_assert!(kingdom.objectives().evaluate(kingdom.state()).is_none());
    }

    /// Night resolution keeps every enemy on the board and away from the crown.
    #[test]
    fn prop_enemies_stay_in_bounds(
        positions in prop::collection::vec(0usize..20, 0..6),
        spawn in edge(),
        walls in prop::collection::vec(any::<bool>(), 20)
    ) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.phase = Phase::Enemy;
        state.enemies = positions
            .iter()
            .filter(|&&p| p != config.crown_pos)
            .map(|&p| Enemy::new(p, 1))
            .collect();
        for (i, wall) in walls.iter().enumerate() {
            if *wall && i != config.crown_pos {
                state.world.get_mut(i).unwrap().wall_level = 1;
            }
        }

        let (next, report) = resolve_night(&state, spawn, &config).unwrap();
        for enemy in &next.enemies {
            prop_assert!(enemy.position < config.board_size);
            prop_assert!(enemy.position != config.crown_pos);
        }
        prop_assert_eq!(report.crown_fell, next.game_over);
        if next.game_over {
            prop_assert_eq!(next.phase, Phase::Enemy);
        } else {
            prop_assert_eq!(next.phase, Phase::Income);
        }
    }

    /// An archer always takes the hit before a wall on the same tile.
    #[test]
    fn prop_archer_before_wall(from_left in any::<bool>(), archers in 1usize..4) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.phase = Phase::Enemy;
        let (start, target) = if from_left { (0, 1) } else { (19, 18) };
        state.enemies = vec![Enemy::new(start, 1)];
        let tile = state.world.get_mut(target).unwrap();
        tile.wall_level = 1;
        tile.garrison = vec![Unit::Archer; archers];

        let (next, report) = resolve_night(&state, None, &config).unwrap();
        let tile = next.world.get(target).unwrap();
        prop_assert_eq!(tile.wall_level, 1);
        prop_assert_eq!(tile.archer_count(), archers - 1);
        prop_assert_eq!(report.defeated, 1);
        prop_assert!(next.enemies.is_empty());
    }
}
