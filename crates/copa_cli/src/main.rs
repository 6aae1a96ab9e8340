//! Copa CLI
//!
//! 토너먼트 스냅샷 점검/기록 도구
//! Standings, awards and record keeping over tournament snapshot files.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use copa_cli::{load_rules, load_snapshot, write_snapshot};
use copa_core::api::schema_json;
use copa_core::audit::audit_snapshot;
use copa_core::awards::{compute_awards, leaderboard, PlayerTotals};
use copa_core::demo::demo_snapshot;
use copa_core::ops::{self, PlayerContribution, ResultSheet};
use copa_core::schedule::{final_readiness, plan_final, plan_round_robin};
use copa_core::standings::{compute_standings, StandingRow, StandingsScope};

#[derive(Parser)]
#[command(name = "copa")]
#[command(about = "Standings & awards engine for small cup tournaments", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ranked standings table
    Standings {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,

        /// Optional ruleset override (YAML or JSON)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Exclude the final from the table
        #[arg(long, default_value = "false")]
        round_robin_only: bool,

        /// Emit JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print the player leaderboard and award podium
    Leaderboard {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show finalist-gate progress (and the champion, once decided)
    Gate {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Check snapshot invariants; exits non-zero on violations
    Audit {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Register a team and its squad
    Register {
        #[arg(long)]
        snapshot: PathBuf,

        /// Team name
        #[arg(long)]
        name: String,

        /// Comma-separated player names
        #[arg(long, value_delimiter = ',')]
        squad: Vec<String>,

        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output path (defaults to updating the snapshot in place)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate the round-robin fixture list (discards existing results)
    Schedule {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Record a match result
    Record {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        match_id: String,

        #[arg(long)]
        home_goals: u32,

        #[arg(long)]
        away_goals: u32,

        /// Optional JSON file with per-player contributions
        #[arg(long)]
        sheet: Option<PathBuf>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create the final between the round-robin top two
    Final {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete matches and stats, zero team counters, keep membership
    Reset {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write a seeded, fully played demo tournament
    Demo {
        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long)]
        out: PathBuf,
    },

    /// Print the JSON Schema for an exchanged document type
    Schema {
        /// One of: snapshot, ruleset, standings, leaderboard, readiness,
        /// delta, audit
        #[arg(long)]
        kind: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Standings { snapshot, rules, round_robin_only, json } => {
            let snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let scope =
                if round_robin_only { StandingsScope::RoundRobin } else { StandingsScope::All };
            let table = compute_standings(&snap, scope, &rules);
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print_standings(&table);
            }
        }

        Commands::Leaderboard { snapshot, rules, json } => {
            let snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let board = leaderboard(&snap, &rules);
            let awards = compute_awards(&snap, &rules);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "leaderboard": board,
                        "awards": awards,
                    }))?
                );
            } else {
                print_leaderboard(&board);
                println!();
                print_award("MVP", awards.mvp.as_ref(), |l| format!("{} pts", l.mvp_points));
                print_award("Top Scorer", awards.top_scorer.as_ref(), |l| {
                    format!("{} goals", l.goals)
                });
                print_award("Top Assister", awards.top_assister.as_ref(), |l| {
                    format!("{} assists", l.assists)
                });
            }
        }

        Commands::Gate { snapshot, rules, json } => {
            let snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let readiness = final_readiness(&snap, &rules);
            if json {
                println!("{}", serde_json::to_string_pretty(&readiness)?);
            } else {
                println!("🔍 Finalist gate");
                println!(
                    "   Round robin: {}/{} completed ({} scheduled)",
                    readiness.completed, readiness.expected, readiness.scheduled
                );
                println!("   Final exists: {}", readiness.final_exists);
                match &readiness.finalists {
                    Some(pair) => {
                        println!(
                            "✅ Gate open: {} vs {}",
                            team_name(&snap, &pair.home),
                            team_name(&snap, &pair.away)
                        );
                    }
                    None => println!("   Gate closed"),
                }
                if let Some(final_match) = snap.final_match() {
                    if let Some(champion) = final_match.winner() {
                        println!("🏆 Champion: {}", team_name(&snap, champion));
                    } else if final_match.completed {
                        println!(
                            "   Final drawn {}-{}",
                            final_match.home_goals, final_match.away_goals
                        );
                    }
                }
            }
        }

        Commands::Audit { snapshot, rules, json } => {
            let snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let report = audit_snapshot(&snap, &rules);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("🔍 Auditing {} ({} checks)", snapshot.display(), report.checks.len());
                for violation in &report.violations {
                    println!("❌ {violation}");
                }
                if report.is_clean() {
                    println!("✅ Snapshot is consistent");
                }
            }
            if !report.is_clean() {
                bail!("audit found {} violation(s)", report.violations.len());
            }
        }

        Commands::Register { snapshot, name, squad, rules, out } => {
            let mut snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let registration = ops::register_team(&snap, &name, &squad, &rules)?;
            ops::apply_registration(&mut snap, &registration);
            let info = write_snapshot(out.as_deref().unwrap_or(&snapshot), &snap)?;
            println!(
                "✅ Registered '{}' with {} players",
                registration.team.name,
                registration.players.len()
            );
            println!("   Snapshot: {} ({} teams)", info.path, info.teams);
        }

        Commands::Schedule { snapshot, rules, out } => {
            let mut snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let plan = plan_round_robin(&snap, &rules)?;
            ops::apply_schedule(&mut snap, &plan);
            let info = write_snapshot(out.as_deref().unwrap_or(&snapshot), &snap)?;
            println!("✅ Scheduled {} fixtures", plan.fixtures.len());
            if !plan.discard_matches.is_empty() {
                println!(
                    "   Discarded {} previous matches and {} stat rows",
                    plan.discard_matches.len(),
                    plan.discard_stats.len()
                );
            }
            println!("   Snapshot: {}", info.path);
        }

        Commands::Record { snapshot, match_id, home_goals, away_goals, sheet, out } => {
            let mut snap = load_snapshot(&snapshot)?;
            let contributions = match sheet {
                Some(path) => read_contributions(&path)?,
                None => Vec::new(),
            };
            let sheet = ResultSheet { match_id, home_goals, away_goals, contributions };
            let delta = ops::record_result(&snap, &sheet)?;
            ops::apply_result(&mut snap, &delta)?;
            let info = write_snapshot(out.as_deref().unwrap_or(&snapshot), &snap)?;
            println!(
                "✅ Recorded {} {}-{} {}",
                team_name(&snap, &delta.home.team_id),
                delta.home_goals,
                delta.away_goals,
                team_name(&snap, &delta.away.team_id)
            );
            println!("   Stat rows added: {}", delta.stats.len());
            println!("   Snapshot: {} ({} completed)", info.path, info.completed_matches);
        }

        Commands::Final { snapshot, rules, out } => {
            let mut snap = load_snapshot(&snapshot)?;
            let rules = load_rules(rules.as_deref())?;
            let final_match = plan_final(&snap, &rules)?;
            ops::apply_final(&mut snap, &final_match);
            let info = write_snapshot(out.as_deref().unwrap_or(&snapshot), &snap)?;
            println!(
                "🏆 Final created: {} vs {}",
                team_name(&snap, &final_match.home),
                team_name(&snap, &final_match.away)
            );
            println!("   Match id: {}", final_match.id);
            println!("   Snapshot: {}", info.path);
        }

        Commands::Reset { snapshot, out } => {
            let mut snap = load_snapshot(&snapshot)?;
            let plan = ops::plan_reset(&snap);
            ops::apply_reset(&mut snap, &plan);
            let info = write_snapshot(out.as_deref().unwrap_or(&snapshot), &snap)?;
            println!(
                "✅ Reset: removed {} matches and {} stat rows",
                plan.delete_matches.len(),
                plan.delete_stats.len()
            );
            println!("   Kept {} teams / {} players", info.teams, info.players);
        }

        Commands::Demo { seed, out } => {
            let snap = demo_snapshot(seed);
            let info = write_snapshot(&out, &snap)?;
            println!("✅ Demo tournament written (seed {seed})");
            println!("   Teams:    {}", info.teams);
            println!("   Players:  {}", info.players);
            println!("   Matches:  {} ({} completed)", info.matches, info.completed_matches);
            println!("   Snapshot: {}", info.path);
        }

        Commands::Schema { kind } => {
            let schema = schema_json(&kind).map_err(anyhow::Error::msg)?;
            println!("{schema}");
        }
    }

    Ok(())
}

fn team_name<'a>(snapshot: &'a copa_core::models::TournamentSnapshot, id: &'a str) -> &'a str {
    snapshot.team(id).map_or(id, |t| t.name.as_str())
}

fn read_contributions(path: &std::path::Path) -> Result<Vec<PlayerContribution>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read sheet file {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse sheet file {}: {e}", path.display()))
}

fn print_standings(table: &[StandingRow]) {
    println!(
        "{:<4} {:<26} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for (position, row) in table.iter().enumerate() {
        println!(
            "{:<4} {:<26} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+5} {:>4}",
            position + 1,
            row.team_name,
            row.played,
            row.wins,
            row.draws,
            row.losses,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points
        );
    }
}

fn print_leaderboard(board: &[PlayerTotals]) {
    if board.is_empty() {
        println!("No scoring contributions recorded yet");
        return;
    }
    println!("{:<4} {:<26} {:>5} {:>7} {:>7}", "#", "Player", "Goals", "Assists", "MVP pts");
    for (position, line) in board.iter().enumerate() {
        println!(
            "{:<4} {:<26} {:>5} {:>7} {:>7}",
            position + 1,
            line.player_name,
            line.goals,
            line.assists,
            line.mvp_points
        );
    }
}

fn print_award(
    label: &str,
    winner: Option<&PlayerTotals>,
    metric: impl Fn(&PlayerTotals) -> String,
) {
    match winner {
        Some(line) => println!("🏅 {label}: {} ({})", line.player_name, metric(line)),
        None => println!("   {label}: not awarded"),
    }
}
