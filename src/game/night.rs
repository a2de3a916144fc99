//! Night resolution: the Greed spawn, march and meet the defenses.
//!
//! Each enemy steps one tile toward the crown, in list order. On arrival it
//! is stopped by exactly one defender: an archer if the tile has one (the
//! archer is spent), otherwise a wall (which loses a level). An enemy that
//! steps onto the crown ends the game and nothing after it is processed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::game::{phase, Enemy, GameConfig, GameState, Phase};

/// Board edge an enemy can spawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Tile 0.
    Left,
    /// The last tile.
    Right,
}

impl Edge {
    /// Tile index of this edge.
    #[must_use]
    pub const fn tile(self, config: &GameConfig) -> usize {
        match self {
            Edge::Left => 0,
            Edge::Right => config.last_tile(),
        }
    }
}

/// What happened during one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NightReport {
    /// The enemy spawned this night, if any.
    pub spawned: Option<Enemy>,
    /// Enemies destroyed by archers or walls.
    pub defeated: u32,
    /// Enemies still on the board at dawn.
    pub survivors: usize,
    /// An enemy reached the crown.
    pub crown_fell: bool,
}

/// Chance that an enemy spawns on `day`, clamped to `[0, 1]`.
#[must_use]
pub fn spawn_chance(day: u32, config: &GameConfig) -> f64 {
    let chance = config.spawn_base_chance + config.spawn_chance_per_day * f64::from(day);
    chance.clamp(0.0, 1.0)
}

/// Decide whether an enemy spawns tonight, and on which edge.
pub fn roll_spawn<R: Rng>(day: u32, config: &GameConfig, rng: &mut R) -> Option<Edge> {
    if day == 0 || rng.random::<f64>() >= spawn_chance(day, config) {
        return None;
    }
    Some(if rng.random_bool(0.5) { Edge::Left } else { Edge::Right })
}

/// Resolve the Enemy phase.
///
/// `spawn` is the outcome of [`roll_spawn`], decided by the caller so this
/// function stays deterministic. Returns `None` outside the Enemy phase or
/// once the game is over.
///
/// If the crown falls, the returned state carries the night's log and the
/// game-over flag but none of its other effects. Otherwise the damaged
/// world, the survivors and the defeat count are committed and the state
/// moves on to the Income phase.
#[must_use]
pub fn resolve_night(
    state: &GameState,
    spawn: Option<Edge>,
    config: &GameConfig,
) -> Option<(GameState, NightReport)> {
    if state.game_over || state.phase != Phase::Enemy {
        return None;
    }

    let mut next = state.clone();
    let mut world = state.world.clone();
    let mut marching = state.enemies.clone();
    let mut report = NightReport::default();

    if let Some(edge) = spawn {
        let enemy = Enemy::new(edge.tile(config), config.enemy_hit_points);
        next.event_log.record(format!(
            "A Greed with {} HP appears at tile {}!",
            enemy.hit_points,
            enemy.position + 1
        ));
        marching.push(enemy);
        report.spawned = Some(enemy);
    }

    let crown = state.crown_pos;
    let mut survivors = Vec::with_capacity(marching.len());

    for enemy in marching {
        let from = enemy.position;
        let to = if from < crown { from + 1 } else { from.saturating_sub(1) };
        let Some(tile) = world.get_mut(to) else {
            warn!(day = state.day, from, to, "enemy step leaves the board, holding position");
            survivors.push(enemy);
            continue;
        };
        next.event_log
            .record(format!("A Greed moves from tile {} to tile {}.", from + 1, to + 1));

        if to == crown {
            next.event_log
                .record("The Greed has reached your crown! The kingdom has fallen.");
            next.game_over = true;
            report.crown_fell = true;
            info!(day = state.day, "the crown has fallen");
            return Some((next, report));
        }

        if tile.take_archer() {
            next.event_log.record(format!(
                "...it is met by an archer at tile {} and is defeated!",
                to + 1
            ));
            report.defeated += 1;
        } else if tile.wall_level > 0 {
            tile.wall_level -= 1;
            next.event_log.record(format!(
                "...it crashes against a wall at tile {} and is destroyed! The wall is damaged.",
                to + 1
            ));
            report.defeated += 1;
        } else {
            survivors.push(Enemy { position: to, ..enemy });
        }
    }

    report.survivors = survivors.len();
    next.world = world;
    next.enemies = survivors;
    next.enemies_defeated = next.enemies_defeated.saturating_add(report.defeated);
    info!(
        day = state.day,
        defeated = report.defeated,
        survivors = report.survivors,
        "night resolved"
    );

    let next = phase::advance(&next, config)?;
    Some((next, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Unit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn night_state(enemies: &[usize]) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.phase = Phase::Enemy;
        state.enemies = enemies.iter().map(|&p| Enemy::new(p, 1)).collect();
        (state, config)
    }

    #[test]
    fn test_spawn_chance_clamped() {
        let config = GameConfig::default();
        assert!((spawn_chance(1, &config) - 0.55).abs() < 1e-9);
        assert!((spawn_chance(10, &config) - 1.0).abs() < 1e-9);
        assert!((spawn_chance(500, &config) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_roll_spawn_certain_at_high_day() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(roll_spawn(20, &config, &mut rng).is_some());
        }
    }

    #[test]
    fn test_roll_spawn_never_with_zero_chance() {
        let config = GameConfig {
            spawn_base_chance: 0.0,
            spawn_chance_per_day: 0.0,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        for day in 1..50 {
            assert!(roll_spawn(day, &config, &mut rng).is_none());
        }
    }

    #[test]
    fn test_edge_tiles() {
        let config = GameConfig::default();
        assert_eq!(Edge::Left.tile(&config), 0);
        assert_eq!(Edge::Right.tile(&config), 19);
    }

    #[test]
    fn test_enemy_advances_on_open_ground() {
        let (state, config) = night_state(&[0]);
        let (next, report) = resolve_night(&state, None, &config).unwrap();

        assert_eq!(next.enemies, vec![Enemy::new(1, 1)]);
        assert_eq!(next.phase, Phase::Income);
        assert!(!next.game_over);
        assert_eq!(next.enemies_defeated, 0);
        assert_eq!(report.survivors, 1);
    }

    #[test]
    fn test_enemy_from_right_steps_left() {
        let (state, config) = night_state(&[19]);
        let (next, _) = resolve_night(&state, None, &config).unwrap();
        assert_eq!(next.enemies[0].position, 18);
    }

    #[test]
    fn test_archer_stops_enemy() {
        let (mut state, config) = night_state(&[0]);
        state.world.get_mut(1).unwrap().garrison.push(Unit::Archer);

        let (next, report) = resolve_night(&state, None, &config).unwrap();
        assert!(next.enemies.is_empty());
        assert!(!next.world.get(1).unwrap().has_archer());
        assert_eq!(next.enemies_defeated, 1);
        assert_eq!(report.defeated, 1);
    }

    #[test]
    fn test_wall_stops_enemy_and_is_damaged() {
        let (mut state, config) = night_state(&[0]);
        state.world.get_mut(1).unwrap().wall_level = 1;

        let (next, _) = resolve_night(&state, None, &config).unwrap();
        assert!(next.enemies.is_empty());
        assert_eq!(next.world.get(1).unwrap().wall_level, 0);
        assert_eq!(next.enemies_defeated, 1);
        assert!(next.event_log.contains("crashes against a wall at tile 2"));
    }

    #[test]
    fn test_archer_preferred_over_wall() {
        let (mut state, config) = night_state(&[0]);
        let tile = state.world.get_mut(1).unwrap();
        tile.wall_level = 1;
        tile.garrison.push(Unit::Archer);

        let (next, _) = resolve_night(&state, None, &config).unwrap();
        let tile = next.world.get(1).unwrap();
        assert!(!tile.has_archer());
        assert_eq!(tile.wall_level, 1);
    }

    #[test]
    fn test_crown_reached_ends_game() {
        let (state, config) = night_state(&[9, 0]);
        let (next, report) = resolve_night(&state, None, &config).unwrap();

        assert!(next.game_over);
        assert!(report.crown_fell);
        assert_eq!(next.phase, Phase::Enemy);
        assert!(next.event_log.contains("The kingdom has fallen"));
        // The second enemy never moved.
        assert!(!next.event_log.contains("from tile 1 to tile 2"));
        assert!(resolve_night(&next, None, &config).is_none());
    }

    #[test]
    fn test_spawned_enemy_moves_same_night() {
        let (state, config) = night_state(&[]);
        let (next, report) = resolve_night(&state, Some(Edge::Right), &config).unwrap();

        assert_eq!(report.spawned, Some(Enemy::new(19, 1)));
        assert_eq!(next.enemies, vec![Enemy::new(18, 1)]);
        assert!(next.event_log.contains("appears at tile 20"));
    }

    #[test]
    fn test_one_defender_per_enemy() {
        let (mut state, config) = night_state(&[0, 0]);
        let tile = state.world.get_mut(1).unwrap();
        tile.garrison.push(Unit::Archer);
        tile.garrison.push(Unit::Archer);
        tile.wall_level = 1;

        let (next, report) = resolve_night(&state, None, &config).unwrap();
        assert_eq!(report.defeated, 2);
        let tile = next.world.get(1).unwrap();
        assert_eq!(tile.archer_count(), 0);
        assert_eq!(tile.wall_level, 1);
    }

    #[test]
    fn test_enemy_kept_when_board_is_short() {
        let (mut state, config) = night_state(&[19]);
        state.world = crate::game::World::new(5);

        let (next, report) = resolve_night(&state, None, &config).unwrap();
        assert_eq!(next.enemies, vec![Enemy::new(19, 1)]);
        assert_eq!(report.survivors, 1);
        assert_eq!(report.defeated, 0);
        assert!(!next.event_log.contains("moves from tile 20"));
    }

    #[test]
    fn test_only_in_enemy_phase() {
        let (mut state, config) = night_state(&[0]);
        state.phase = Phase::Build;
        assert!(resolve_night(&state, None, &config).is_none());
    }
}
