/// Session persistence: which level the player was on, plus the live
/// puzzle state on that level.
///
/// ## File format:
///   JSON, one object:
///   ```text
///   { "level": 3,
///     "snapshot": { "player": {"x":2,"y":1}, "stars": [...],
///                   "selected": null, "steps": 17 } }
///   ```
///   `snapshot` is null when the level should start fresh.
///
/// Failures are reported as `SaveError` and never abort the session; the
/// caller logs them and starts from the beginning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::entity::PuzzleState;
use crate::error::SaveError;
use crate::sim::world::WorldState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    /// 0-based index into the level pack.
    pub level: usize,
    #[serde(default)]
    pub snapshot: Option<PuzzleState>,
}

impl SaveData {
    /// Capture the session on `world`, whose pack index is `level`.
    pub fn capture(level: usize, world: &WorldState) -> Self {
        SaveData { level, snapshot: Some(world.current_state().clone()) }
    }

    /// Level only; it restarts from its starting configuration.
    pub fn level_start(level: usize) -> Self {
        SaveData { level, snapshot: None }
    }
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Directory for the save file and log.
pub fn save_dir() -> PathBuf {
    // 1. Exe directory, if writable (portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let probe = parent.join(".write_test_starpusher");
            if std::fs::write(&probe, "").is_ok() {
                let _ = std::fs::remove_file(&probe);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/starpusher");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// Save / load
// ══════════════════════════════════════════════════════════════

pub fn save_session(path: &Path, data: &SaveData) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), level = data.level, "session saved");
    Ok(())
}

/// `Ok(None)` when there is no save file yet.
pub fn load_session(path: &Path) -> Result<Option<SaveData>, SaveError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no save file");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let data: SaveData = serde_json::from_str(&content)?;
    info!(path = %path.display(), level = data.level, resumed = data.snapshot.is_some(), "session loaded");
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Cell;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("starpusher_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let mut snap = PuzzleState::new(Cell::new(2, 1), vec![Cell::new(3, 1), Cell::new(4, 2)]);
        snap.selected = Some(1);
        snap.steps = 17;
        let data = SaveData { level: 3, snapshot: Some(snap) };

        save_session(&path, &data).unwrap();
        let loaded = load_session(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, Some(data));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = temp_path("missing");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load_session(&path), Ok(None)));
    }

    #[test]
    fn garbage_is_a_format_error() {
        let path = temp_path("garbage");
        std::fs::write(&path, "level=3\nscore=10\n").unwrap();
        let result = load_session(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(SaveError::Json(_))));
    }

    #[test]
    fn snapshot_field_is_optional() {
        let data: SaveData = serde_json::from_str(r#"{"level": 2}"#).unwrap();
        assert_eq!(data, SaveData::level_start(2));
    }
}
