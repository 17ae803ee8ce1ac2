use thiserror::Error;

/// Why an engine operation did nothing. Rejections never mutate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("target is outside the grid")]
    OutOfBounds,
    #[error("target is a wall")]
    Wall,
    #[error("star is blocked")]
    Blocked,
    #[error("target cannot be reached")]
    Unreachable,
    #[error("nothing would move")]
    NoMovement,
    #[error("a star is selected")]
    SelectionActive,
    #[error("no star is selected")]
    NothingSelected,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Level data that fails validation. Fatal for that level only.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("Level {level} (around line {line}) is missing a \"@\" or \"+\" to mark the start point.")]
    MissingStart { level: usize, line: usize },
    #[error("Level {level} (around line {line}) has more than one start point.")]
    MultipleStarts { level: usize, line: usize },
    #[error("Level {level} (around line {line}) must have at least one goal.")]
    NoGoals { level: usize, line: usize },
    #[error("Level {level} (around line {line}) is impossible to solve. It has {goals} goals but only {stars} stars.")]
    NotEnoughStars { level: usize, line: usize, goals: usize, stars: usize },
    #[error("cannot read level file: {0}")]
    Io(#[from] std::io::Error),
}

/// Session save/restore failure. Logged, never fatal.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file format: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved state does not fit level: {0}")]
    Mismatch(String),
}

/// `config.toml` problems. Logged; defaults are used instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
