/// Entities: cells, movement directions and the puzzle snapshot.
///
/// `PuzzleState` is the unit the history stores and the save file persists:
/// player cell, ordered star cells, optional selected star, step counter.

use serde::{Deserialize, Serialize};

/// Grid coordinate, 0-based, `x` = column, `y` = row.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }

    /// Neighbor one step in `dir`. None when it would leave the
    /// non-negative quadrant; upper bounds are the grid's concern.
    pub fn offset(self, dir: MoveDir) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Cell { x, y })
    }
}

/// Movement direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub const ALL: [MoveDir; 4] = [MoveDir::Up, MoveDir::Left, MoveDir::Right, MoveDir::Down];

    pub fn delta(self) -> (isize, isize) {
        match self {
            MoveDir::Left  => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up    => (0, -1),
            MoveDir::Down  => (0, 1),
        }
    }

    pub fn opposite(self) -> MoveDir {
        match self {
            MoveDir::Left  => MoveDir::Right,
            MoveDir::Right => MoveDir::Left,
            MoveDir::Up    => MoveDir::Down,
            MoveDir::Down  => MoveDir::Up,
        }
    }
}

/// Index into `PuzzleState::stars`. Stable for the whole level session:
/// stars are moved in place, never reordered.
pub type StarId = usize;

/// Complete mutable puzzle state.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PuzzleState {
    pub player: Cell,
    pub stars: Vec<Cell>,
    pub selected: Option<StarId>,
    pub steps: u32,
}

impl PuzzleState {
    pub fn new(player: Cell, stars: Vec<Cell>) -> Self {
        PuzzleState { player, stars, selected: None, steps: 0 }
    }

    /// Which star (if any) sits on `cell`?
    pub fn star_at(&self, cell: Cell) -> Option<StarId> {
        self.stars.iter().position(|&s| s == cell)
    }

    pub fn has_star(&self, cell: Cell) -> bool {
        self.star_at(cell).is_some()
    }

    /// Cell of the currently selected star.
    pub fn selected_cell(&self) -> Option<Cell> {
        self.selected.and_then(|id| self.stars.get(id).copied())
    }

    /// True iff every goal is covered by some star. Surplus stars are fine.
    pub fn covers(&self, goals: &[Cell]) -> bool {
        goals.iter().all(|g| self.has_star(*g))
    }
}
