/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD or the
/// XDG data directory. Falls back to defaults if the file is missing,
/// unreadable or incomplete.
///
/// ```toml
/// [general]
/// levels_file = "starPusherLevels.txt"
/// save_file = "starpusher_save.json"
///
/// [play]
/// history_limit = 300
/// fast_repeat = 5
/// run_repeat = 100
/// ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::sim::history::DEFAULT_HISTORY_LIMIT;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub levels_file: PathBuf,
    /// File name only; lives in the save directory.
    pub save_file: String,
    pub play: PlayConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayConfig {
    pub history_limit: usize,
    /// Steps per Ctrl+arrow.
    pub fast_repeat: u32,
    /// Steps per Shift+arrow.
    pub run_repeat: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    play: TomlPlay,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_file")]
    levels_file: String,
    #[serde(default = "default_save_file")]
    save_file: String,
}

#[derive(Deserialize, Debug)]
struct TomlPlay {
    #[serde(default = "default_history_limit")]
    history_limit: usize,
    #[serde(default = "default_fast_repeat")]
    fast_repeat: u32,
    #[serde(default = "default_run_repeat")]
    run_repeat: u32,
}

// ── Defaults ──

fn default_levels_file() -> String { "starPusherLevels.txt".into() }
fn default_save_file() -> String { "starpusher_save.json".into() }
fn default_history_limit() -> usize { DEFAULT_HISTORY_LIMIT }
fn default_fast_repeat() -> u32 { 5 }
fn default_run_repeat() -> u32 { 100 }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_file: default_levels_file(),
            save_file: default_save_file(),
        }
    }
}

impl Default for TomlPlay {
    fn default() -> Self {
        TomlPlay {
            history_limit: default_history_limit(),
            fast_repeat: default_fast_repeat(),
            run_repeat: default_run_repeat(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = match load_toml(&search_dirs) {
            Ok(Some((path, cfg))) => {
                info!(path = %path.display(), "loaded config");
                cfg
            }
            Ok(None) => TomlConfig::default(),
            Err(e) => {
                warn!("{e}; using default settings");
                TomlConfig::default()
            }
        };
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text. Relative levels paths stay relative.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg, &[]))
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let levels_file = resolve_levels_file(&cfg.general.levels_file, search_dirs);
        GameConfig {
            levels_file,
            save_file: cfg.general.save_file,
            play: PlayConfig {
                history_limit: cfg.play.history_limit.max(1),
                fast_repeat: cfg.play.fast_repeat.max(1),
                run_repeat: cfg.play.run_repeat.max(1),
            },
        }
    }
}

/// Absolute paths are used as-is; relative ones are looked up in each
/// search dir and otherwise left relative to CWD.
fn resolve_levels_file(name: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs.iter()
        .map(|d| d.join(name))
        .find(|p| p.is_file())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/starpusher)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/starpusher");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First readable config.toml in the search dirs.
fn load_toml(search_dirs: &[PathBuf]) -> Result<Option<(PathBuf, TomlConfig)>, ConfigError> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg = toml::from_str::<TomlConfig>(&text)?;
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}
