use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use copa_core::awards::{compute_awards, leaderboard};
use copa_core::demo::demo_snapshot;
use copa_core::rules::Ruleset;
use copa_core::schedule::final_readiness;
use copa_core::standings::{compute_standings, StandingsScope};

fn bench_standings(c: &mut Criterion) {
    let snapshot = demo_snapshot(42);
    let rules = Ruleset::default();
    c.bench_function("compute_standings/all", |b| {
        b.iter(|| compute_standings(black_box(&snapshot), StandingsScope::All, &rules))
    });
    c.bench_function("compute_standings/round_robin", |b| {
        b.iter(|| compute_standings(black_box(&snapshot), StandingsScope::RoundRobin, &rules))
    });
}

fn bench_player_views(c: &mut Criterion) {
    let snapshot = demo_snapshot(42);
    let rules = Ruleset::default();
    c.bench_function("leaderboard", |b| b.iter(|| leaderboard(black_box(&snapshot), &rules)));
    c.bench_function("compute_awards", |b| {
        b.iter(|| compute_awards(black_box(&snapshot), &rules))
    });
}

fn bench_gate(c: &mut Criterion) {
    let snapshot = demo_snapshot(42);
    let rules = Ruleset::default();
    c.bench_function("final_readiness", |b| {
        b.iter(|| final_readiness(black_box(&snapshot), &rules))
    });
}

criterion_group!(benches, bench_standings, bench_player_views, bench_gate);
criterion_main!(benches);
