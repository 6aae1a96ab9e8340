//! Copa CLI Library
//!
//! 스냅샷 JSON 파일 입출력 + 룰셋 로딩
//! Snapshot JSON file IO and ruleset loading for the `copa` binary.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use copa_core::models::TournamentSnapshot;
use copa_core::rules::Ruleset;

/// Summary of a snapshot file just written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub path: String,
    pub teams: usize,
    pub players: usize,
    pub matches: usize,
    pub completed_matches: usize,
    pub stat_rows: usize,
    /// Write time (RFC3339).
    pub written_at: String,
}

/// Read and parse a tournament snapshot file.
pub fn load_snapshot(path: &Path) -> Result<TournamentSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))
}

/// Write a snapshot as pretty-printed JSON, creating parent directories.
pub fn write_snapshot(path: &Path, snapshot: &TournamentSnapshot) -> Result<SnapshotInfo> {
    let raw = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, raw)
        .with_context(|| format!("Failed to write snapshot file: {}", path.display()))?;

    Ok(SnapshotInfo {
        path: path.display().to_string(),
        teams: snapshot.teams.len(),
        players: snapshot.players.len(),
        matches: snapshot.matches.len(),
        completed_matches: snapshot.matches.iter().filter(|m| m.completed).count(),
        stat_rows: snapshot.stats.len(),
        written_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// Load a ruleset override, or the embedded standard ruleset when no path
/// is given. `.json` files parse as JSON, everything else as YAML; either
/// way the result is validated.
pub fn load_rules(path: Option<&Path>) -> Result<Ruleset> {
    let rules = match path {
        None => Ruleset::standard().clone(),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read ruleset file: {}", path.display()))?;
            if path.extension().is_some_and(|ext| ext == "json") {
                serde_json::from_str(&raw).with_context(|| {
                    format!("Failed to parse ruleset file: {}", path.display())
                })?
            } else {
                Ruleset::from_yaml_str(&raw).map_err(|e| anyhow!(e))?
            }
        }
    };
    rules.validate().map_err(|e| anyhow!("Invalid ruleset: {e}"))?;
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use copa_core::demo::demo_snapshot;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn snapshot_round_trips_through_a_file() -> Result<()> {
        let snapshot = demo_snapshot(1);
        let file = NamedTempFile::new()?;

        let info = write_snapshot(file.path(), &snapshot)?;
        assert_eq!(info.teams, 4);
        assert_eq!(info.matches, 6);
        assert_eq!(info.completed_matches, 6);

        let loaded = load_snapshot(file.path())?;
        assert_eq!(loaded, snapshot);
        Ok(())
    }

    #[test]
    fn write_creates_missing_directories() -> Result<()> {
        let dir = TempDir::new()?;
        let nested = dir.path().join("out/run1/snapshot.json");
        write_snapshot(&nested, &TournamentSnapshot::default())?;
        assert!(nested.exists());
        Ok(())
    }

    #[test]
    fn malformed_snapshot_is_an_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"{ not json")?;
        assert!(load_snapshot(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn missing_rules_path_gives_the_standard_ruleset() -> Result<()> {
        let rules = load_rules(None)?;
        assert_eq!(rules, Ruleset::default());
        Ok(())
    }

    #[test]
    fn yaml_override_is_loaded_and_validated() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"points_win: 4\nleaderboard_size: 5\n")?;
        let rules = load_rules(Some(file.path()))?;
        assert_eq!(rules.points_win, 4);
        assert_eq!(rules.leaderboard_size, 5);
        assert_eq!(rules.team_count, 4);
        Ok(())
    }

    #[test]
    fn json_override_is_loaded_by_extension() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{ "mvp_assist_weight": 2 }"#)?;
        let rules = load_rules(Some(&path))?;
        assert_eq!(rules.mvp_assist_weight, 2);
        Ok(())
    }

    #[test]
    fn degenerate_override_is_rejected() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"points_win: 1\npoints_draw: 1\n")?;
        assert!(load_rules(Some(file.path())).is_err());
        Ok(())
    }
}
