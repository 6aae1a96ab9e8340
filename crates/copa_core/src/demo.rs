//! Seeded demo tournament.
//!
//! Builds a played-out standard cup by driving the real operations:
//! register four squads, plan the round robin, then record a random-looking
//! result sheet for every fixture. Same seed, same tournament. Handy for
//! CLI smoke runs, benches and tests that want a populated snapshot.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::models::{Player, TournamentSnapshot};
use crate::ops::{self, PlayerContribution, ResultSheet};
use crate::rules::Ruleset;
use crate::schedule;

const TEAM_NAMES: [&str; 4] =
    ["Harbor Lions", "Mill Road Rovers", "Northside Union", "Old Quarter Wanderers"];

const FIRST_NAMES: [&str; 12] = [
    "Alex", "Bela", "Caro", "Dani", "Els", "Fede", "Gio", "Hana", "Imre", "Jo", "Kai", "Lena",
];

const LAST_NAMES: [&str; 12] = [
    "Abito", "Bakker", "Costa", "Dreyer", "Egede", "Farkas", "Grahn", "Hoek", "Iversen", "Juhl",
    "Kovar", "Lindt",
];

/// A finished round robin under the standard ruleset, no final yet.
///
/// # Panics
/// Panics only if the engine rejects its own generated data, which the
/// demo tests guard against.
pub fn demo_snapshot(seed: u64) -> TournamentSnapshot {
    let rules = Ruleset::default();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut snapshot = TournamentSnapshot::default();

    for name in TEAM_NAMES {
        let squad: Vec<String> = (0..rules.squad_size).map(|_| pick_name(&mut rng)).collect();
        let registration =
            ops::register_team(&snapshot, name, &squad, &rules).expect("demo roster is valid");
        ops::apply_registration(&mut snapshot, &registration);
    }

    let plan = schedule::plan_round_robin(&snapshot, &rules)
        .expect("demo registers the standard team count");
    ops::apply_schedule(&mut snapshot, &plan);

    let fixture_ids: Vec<String> = snapshot.matches.iter().map(|m| m.id.clone()).collect();
    for match_id in fixture_ids {
        let sheet = random_sheet(&snapshot, &match_id, &mut rng);
        let delta = ops::record_result(&snapshot, &sheet).expect("demo sheet is valid");
        ops::apply_result(&mut snapshot, &delta).expect("delta fits the snapshot it came from");
    }

    log::info!("demo tournament generated with seed {seed}");
    snapshot
}

fn pick_name(rng: &mut ChaCha8Rng) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

/// Scoreline of 0..=4 per side. Every goal names a scorer from the right
/// roster; about half also name a distinct assister.
fn random_sheet(
    snapshot: &TournamentSnapshot,
    match_id: &str,
    rng: &mut ChaCha8Rng,
) -> ResultSheet {
    let fixture = snapshot.match_by_id(match_id).expect("fixture was just planned");
    let home_goals: u32 = rng.gen_range(0..=4);
    let away_goals: u32 = rng.gen_range(0..=4);

    let mut contributions: Vec<PlayerContribution> = Vec::new();
    let sides = [(fixture.home.clone(), home_goals), (fixture.away.clone(), away_goals)];
    for (team_id, goals) in sides {
        let roster: Vec<&Player> = snapshot.team_players(&team_id).collect();
        for _ in 0..goals {
            let scorer = roster[rng.gen_range(0..roster.len())];
            bump(&mut contributions, &scorer.id, 1, 0);
            if rng.gen_bool(0.5) {
                let assister = roster[rng.gen_range(0..roster.len())];
                if assister.id != scorer.id {
                    bump(&mut contributions, &assister.id, 0, 1);
                }
            }
        }
    }

    ResultSheet {
        match_id: match_id.to_string(),
        home_goals,
        away_goals,
        contributions,
    }
}

/// Merge a contribution into an existing line; result sheets may name a
/// player only once.
fn bump(contributions: &mut Vec<PlayerContribution>, player_id: &str, goals: u32, assists: u32) {
    if let Some(line) = contributions.iter_mut().find(|c| c.player_id == player_id) {
        line.goals += goals;
        line.assists += assists;
    } else {
        contributions.push(PlayerContribution {
            player_id: player_id.to_string(),
            goals,
            assists,
        });
    }
}
