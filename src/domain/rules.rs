/// Direct-step rules: truth-table driven.
///
/// Pure functions operating on grid + puzzle state, no side effects.
/// These encode "what is legal" without performing the action.
///
/// ## Step Truth Table
///
/// ┌──────────────────────────────────┬─────────┬──────────────────┐
/// │ Condition                         │ Result  │ Notes            │
/// ├──────────────────────────────────┼─────────┼──────────────────┤
/// │ target off the grid               │ DENY    │ edge = wall      │
/// │ target is wall / corner wall      │ DENY    │                  │
/// │ target holds star, beyond wall    │ DENY    │ incl. off grid   │
/// │ target holds star, beyond star    │ DENY    │ no chain pushes  │
/// │ target holds star, beyond free    │ PUSH    │ star → beyond    │
/// │ otherwise                         │ WALK    │ exterior floor ok │
/// └──────────────────────────────────┴─────────┴──────────────────┘
///
/// Direct steps never consult the reachability engine, so exterior floor
/// is walkable here even though searches refuse it.

use super::entity::{Cell, MoveDir, PuzzleState, StarId};
use super::grid::Grid;

/// A legal direct step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    Walk { to: Cell },
    Push { to: Cell, star: StarId, star_to: Cell },
}

/// Why a direct step is illegal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepDenied {
    OutOfBounds,
    Wall,
    Blocked,
}

/// Evaluate a direct step from the current player cell.
pub fn resolve_step(grid: &Grid, state: &PuzzleState, dir: MoveDir) -> Result<StepOutcome, StepDenied> {
    let to = grid.step(state.player, dir).ok_or(StepDenied::OutOfBounds)?;
    if !grid.tile(to).is_steppable() { return Err(StepDenied::Wall); }

    let Some(star) = state.star_at(to) else {
        return Ok(StepOutcome::Walk { to });
    };

    let beyond = grid.step(to, dir).ok_or(StepDenied::Blocked)?;
    if grid.is_wall(beyond) || state.has_star(beyond) {
        return Err(StepDenied::Blocked);
    }

    Ok(StepOutcome::Push { to, star, star_to: beyond })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::tests::grid_from;

    fn state(player: Cell, stars: &[(usize, usize)]) -> PuzzleState {
        PuzzleState::new(player, stars.iter().map(|&(x, y)| Cell::new(x, y)).collect())
    }

    #[test]
    fn walk_onto_floor() {
        let (g, p) = grid_from(&["#@ #"]);
        assert_eq!(resolve_step(&g, &state(p, &[]), MoveDir::Right), Ok(StepOutcome::Walk { to: Cell::new(2, 0) }));
    }

    #[test]
    fn wall_denied() {
        let (g, p) = grid_from(&["#@ #"]);
        assert_eq!(resolve_step(&g, &state(p, &[]), MoveDir::Left), Err(StepDenied::Wall));
    }

    #[test]
    fn grid_edge_denied() {
        let (g, p) = grid_from(&["@ "]);
        assert_eq!(resolve_step(&g, &state(p, &[]), MoveDir::Left), Err(StepDenied::OutOfBounds));
        assert_eq!(resolve_step(&g, &state(p, &[]), MoveDir::Up), Err(StepDenied::OutOfBounds));
    }

    #[test]
    fn push_into_free_cell() {
        let (g, p) = grid_from(&["#@  #"]);
        assert_eq!(
            resolve_step(&g, &state(p, &[(2, 0)]), MoveDir::Right),
            Ok(StepOutcome::Push { to: Cell::new(2, 0), star: 0, star_to: Cell::new(3, 0) })
        );
    }

    #[test]
    fn push_into_wall_or_star_denied() {
        let (g, p) = grid_from(&["#@  #"]);
        assert_eq!(resolve_step(&g, &state(p, &[(3, 0)]), MoveDir::Right), Ok(StepOutcome::Walk { to: Cell::new(2, 0) }));
        let s = state(Cell::new(2, 0), &[(3, 0)]);
        assert_eq!(resolve_step(&g, &s, MoveDir::Right), Err(StepDenied::Blocked));
        assert_eq!(resolve_step(&g, &state(p, &[(2, 0), (3, 0)]), MoveDir::Right), Err(StepDenied::Blocked));
    }

    #[test]
    fn push_off_grid_edge_denied() {
        let (g, p) = grid_from(&["@ "]);
        assert_eq!(resolve_step(&g, &state(p, &[(1, 0)]), MoveDir::Right), Err(StepDenied::Blocked));
    }

    #[test]
    fn exterior_floor_is_walkable() {
        let (g, _) = grid_from(&["@#  "]);
        let s = state(Cell::new(2, 0), &[]);
        assert!(!g.is_interior(Cell::new(3, 0)));
        assert_eq!(resolve_step(&g, &s, MoveDir::Right), Ok(StepOutcome::Walk { to: Cell::new(3, 0) }));
    }
}
