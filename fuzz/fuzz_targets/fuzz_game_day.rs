#![no_main]

//! Reducer fuzzer.
//!
//! Drives arbitrary command sequences through `Kingdom::apply` on a small,
//! fuzzer-shaped board and checks after every command that:
//! 1. The state invariants hold
//! 2. Refused commands leave the kingdom untouched
//! 3. Completed objectives never revert

use arbitrary::Arbitrary;
use kingdom::game::{
    check_invariants, Action, Command, Edge, GameConfig, Kingdom, ObjectiveCatalog,
};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzCommand {
    MoveLeft,
    MoveRight,
    HirePeasant,
    TrainArcher,
    BuildWall,
    BuildFarm,
    EndPhase,
    Night { spawn: u8 },
    Income,
}

impl FuzzCommand {
    fn to_command(self) -> Command {
        match self {
            Self::MoveLeft => Command::Act(Action::MoveLeft),
            Self::MoveRight => Command::Act(Action::MoveRight),
            Self::HirePeasant => Command::Act(Action::HirePeasant),
            Self::TrainArcher => Command::Act(Action::TrainArcher),
            Self::BuildWall => Command::Act(Action::BuildWall),
            Self::BuildFarm => Command::Act(Action::BuildFarm),
            Self::EndPhase => Command::EndPhase,
            Self::Night { spawn } => Command::ResolveNight {
                spawn: match spawn % 3 {
                    0 => None,
                    1 => Some(Edge::Left),
                    _ => Some(Edge::Right),
                },
            },
            Self::Income => Command::CollectIncome,
        }
    }
}

/// Structured input for reducer fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    /// Board size before clamping.
    board_size: u8,
    /// Crown tile before clamping.
    crown: u8,
    /// Starting coins.
    coins: u8,
    /// Commands to apply in order.
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: GameInput| {
    let board_size = usize::from(input.board_size % 30).max(3);
    let crown = (usize::from(input.crown) % (board_size - 2)) + 1;
    let config = GameConfig {
        board_size,
        crown_pos: crown,
        player_start: crown,
        starting_farms: Vec::new(),
        starting_coins: u32::from(input.coins),
        ..GameConfig::default()
    };

    let Ok(mut kingdom) = Kingdom::new(config, ObjectiveCatalog::default()) else {
        return;
    };

    let violations = check_invariants(kingdom.state(), kingdom.config());
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    for (i, fuzz) in input.commands.iter().take(200).enumerate() {
        let command = fuzz.to_command();
        let step = kingdom.apply(&command);

        if !step.outcome.changed() {
            assert_eq!(step.kingdom.state(), kingdom.state(), "refused {command:?} changed state");
        }
        for (before, after) in kingdom.objectives().iter().zip(step.kingdom.objectives().iter()) {
            assert!(!before.completed || after.completed, "objective {} reverted", before.id);
        }

        kingdom = step.kingdom;
        let violations = check_invariants(kingdom.state(), kingdom.config());
        assert!(
            violations.is_empty(),
            "Invariants violated after command {i} ({command:?}): {violations:?}"
        );
    }
});
