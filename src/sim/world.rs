/// WorldState: the engine object for one level session.
///
/// ## Ownership
///
/// The session controller owns one `WorldState` per level and passes it by
/// reference to every operation. Nothing here is global.
///
/// ## Layers
///   - `grid`, `goals`: the level as loaded. **Never mutated** after load.
///   - `state`: the live `PuzzleState` (player, stars, selection, steps).
///   - `history`: undo/redo snapshots of `state`.
///
/// All mutations go through the operations in `sim::step`, which record
/// into `history` after every success and leave everything untouched on
/// rejection.

use std::collections::HashSet;

use crate::domain::entity::{Cell, PuzzleState, StarId};
use crate::domain::grid::Grid;
use crate::domain::path::ObstacleSet;
use crate::error::SaveError;
use crate::sim::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::sim::level::Level;

pub struct WorldState {
    // ── Level (immutable) ──
    pub(crate) grid: Grid,
    pub(crate) goals: Vec<Cell>,
    pub(crate) start: PuzzleState,
    level_number: usize,

    // ── Live state ──
    pub(crate) state: PuzzleState,
    pub(crate) history: History,

    // ── HUD ──
    /// Step cost of the most recent long-range action.
    pub(crate) last_jump: u32,
}

// ── Construction ──

impl WorldState {
    /// Fresh session from the level's starting configuration.
    pub fn new(level: &Level) -> Self {
        Self::with_history_limit(level, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(level: &Level, limit: usize) -> Self {
        let mut history = History::new(limit);
        history.record(&level.start);
        WorldState {
            grid: level.grid.clone(),
            goals: level.goals.clone(),
            start: level.start.clone(),
            level_number: level.number,
            state: level.start.clone(),
            history,
            last_jump: 0,
        }
    }

    /// Session resumed from a persisted snapshot. The snapshot must fit the
    /// level; otherwise the caller falls back to `new`.
    pub fn restore(level: &Level, snapshot: PuzzleState, limit: usize) -> Result<Self, SaveError> {
        validate_snapshot(level, &snapshot)?;
        let mut world = Self::with_history_limit(level, limit);
        world.history.reset(&snapshot);
        world.state = snapshot;
        Ok(world)
    }
}

// ── Read-only accessors (for rendering) ──

impl WorldState {
    /// Read-only snapshot of the live state.
    pub fn current_state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }

    pub fn level_number(&self) -> usize {
        self.level_number
    }

    pub fn last_jump(&self) -> u32 {
        self.last_jump
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Every goal holds a star.
    pub fn is_complete(&self) -> bool {
        self.state.covers(&self.goals)
    }

    pub fn is_goal(&self, cell: Cell) -> bool {
        self.goals.contains(&cell)
    }

    /// Cells of all stars, optionally leaving one out.
    pub(crate) fn star_obstacles(&self, except: Option<StarId>) -> ObstacleSet {
        self.state.stars.iter().enumerate()
            .filter(|(i, _)| Some(*i) != except)
            .map(|(_, c)| *c)
            .collect()
    }
}

/// Reject snapshots that cannot belong to `level`.
fn validate_snapshot(level: &Level, snap: &PuzzleState) -> Result<(), SaveError> {
    let grid = &level.grid;
    if snap.stars.len() != level.start.stars.len() {
        return Err(SaveError::Mismatch(format!(
            "{} stars saved, level {} has {}",
            snap.stars.len(), level.number, level.start.stars.len(),
        )));
    }
    if grid.is_wall(snap.player) {
        return Err(SaveError::Mismatch(format!("player on wall at {:?}", snap.player)));
    }
    let mut seen = HashSet::with_capacity(snap.stars.len());
    for &star in &snap.stars {
        if grid.is_wall(star) {
            return Err(SaveError::Mismatch(format!("star on wall at {:?}", star)));
        }
        if !seen.insert(star) {
            return Err(SaveError::Mismatch(format!("two stars at {:?}", star)));
        }
    }
    if seen.contains(&snap.player) {
        return Err(SaveError::Mismatch(format!("player on a star at {:?}", snap.player)));
    }
    if let Some(id) = snap.selected {
        if id >= snap.stars.len() {
            return Err(SaveError::Mismatch(format!("selected star {id} does not exist")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::parse_pack;

    fn level() -> Level {
        parse_pack("######\n#@$ .#\n######\n").remove(0).unwrap()
    }

    #[test]
    fn fresh_session_matches_start() {
        let lv = level();
        let w = WorldState::new(&lv);
        assert_eq!(w.current_state(), &lv.start);
        assert_eq!(w.history().past_len(), 1);
        assert!(!w.is_complete());
        assert!(w.is_goal(Cell::new(4, 1)));
    }

    #[test]
    fn restore_accepts_matching_snapshot() {
        let lv = level();
        let mut snap = lv.start.clone();
        snap.player = Cell::new(2, 1);
        snap.stars = vec![Cell::new(3, 1)];
        snap.selected = Some(0);
        snap.steps = 9;
        let w = WorldState::restore(&lv, snap.clone(), 300).unwrap();
        assert_eq!(w.current_state(), &snap);
        assert_eq!(w.history().past_len(), 1);
    }

    #[test]
    fn restore_rejects_foreign_snapshots() {
        let lv = level();
        let mut wrong_count = lv.start.clone();
        wrong_count.stars.push(Cell::new(3, 1));
        assert!(matches!(WorldState::restore(&lv, wrong_count, 300), Err(SaveError::Mismatch(_))));

        let mut in_wall = lv.start.clone();
        in_wall.player = Cell::new(0, 0);
        assert!(WorldState::restore(&lv, in_wall, 300).is_err());

        let mut off_grid = lv.start.clone();
        off_grid.stars[0] = Cell::new(40, 40);
        assert!(WorldState::restore(&lv, off_grid, 300).is_err());

        let mut bad_selection = lv.start.clone();
        bad_selection.selected = Some(3);
        assert!(WorldState::restore(&lv, bad_selection, 300).is_err());

        let mut overlap = lv.start.clone();
        overlap.player = lv.start.stars[0];
        assert!(WorldState::restore(&lv, overlap, 300).is_err());
    }

    #[test]
    fn obstacles_leave_out_selected_star() {
        let lv = parse_pack("#######\n#@$ $.#\n#   . #\n#######\n").remove(0).unwrap();
        let w = WorldState::new(&lv);
        assert_eq!(w.star_obstacles(None).len(), 2);
        let without_first = w.star_obstacles(Some(0));
        assert_eq!(without_first.len(), 1);
        assert!(without_first.contains(&Cell::new(4, 1)));
    }
}
