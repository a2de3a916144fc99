//! Benchmarks for the game reducer and headless games.
//!
//! Night resolution and whole autoplay games are the hot paths for
//! `kingdom simulate`.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use kingdom::autoplay::{run_game, AutoplayConfig, Stance};
use kingdom::game::{resolve_night, Edge, Enemy, GameConfig, GameState, Phase, Unit};

fn bench_resolve_night(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut state = GameState::new(&config);
    state.phase = Phase::Enemy;
    state.enemies = vec![Enemy::new(0, 1), Enemy::new(3, 1), Enemy::new(17, 1), Enemy::new(12, 1)];
    state.world.get_mut(4).unwrap().garrison.push(Unit::Archer);
    state.world.get_mut(16).unwrap().wall_level = 1;

    c.bench_function("resolve_night_4_enemies", |b| {
        b.iter(|| {
            let result = resolve_night(black_box(&state), black_box(Some(Edge::Left)), &config);
            black_box(result)
        });
    });
}

fn bench_single_game(c: &mut Criterion) {
    let config = AutoplayConfig::default();

    c.bench_function("single_game_balanced", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), Stance::Balanced, black_box(&config));
            black_box(result)
        });
    });
}

fn bench_game_batch(c: &mut Criterion) {
    // Sequential, without parallel overhead
    let config = AutoplayConfig::default();

    c.bench_function("10_games_sequential", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                for stance in Stance::ALL {
                    black_box(run_game(seed, stance, &config));
                }
            }
        });
    });
}

criterion_group!(benches, bench_resolve_night, bench_single_game, bench_game_batch);
criterion_main!(benches);
