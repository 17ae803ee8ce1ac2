/// Engine operations: every way the puzzle state can change.
///
/// Each operation either succeeds, mutates `state`, records into `history`
/// and returns the `GameEvent`, or is rejected and leaves the world exactly
/// as it was.
///
/// Walkability:
///   direct step  = anything not a wall (exterior floor included)
///   search-based = interior floor only (teleport, push, select)

use tracing::debug;

use crate::domain::entity::{Cell, MoveDir};
use crate::domain::path::shortest_path;
use crate::domain::push::plan_push;
use crate::domain::rules::{self, StepDenied, StepOutcome};
use crate::error::Rejected;
use super::event::GameEvent;
use super::world::WorldState;

impl From<StepDenied> for Rejected {
    fn from(d: StepDenied) -> Self {
        match d {
            StepDenied::OutOfBounds => Rejected::OutOfBounds,
            StepDenied::Wall => Rejected::Wall,
            StepDenied::Blocked => Rejected::Blocked,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Direct movement
// ══════════════════════════════════════════════════════════════

impl WorldState {
    /// One cell in `dir`, pushing a star if one is in the way.
    pub fn step(&mut self, dir: MoveDir) -> Result<GameEvent, Rejected> {
        let event = self.apply_step(dir).map_err(|e| reject("step", e))?;
        self.history.record(&self.state);
        self.last_jump = 0;
        Ok(event)
    }

    /// Up to `count` steps in `dir`, stopping at the first rejected one.
    /// The run is one history entry. Fails only if no step succeeded.
    pub fn step_repeat(&mut self, dir: MoveDir, count: u32) -> Result<GameEvent, Rejected> {
        let mut done = 0;
        let mut first_err = None;
        for _ in 0..count {
            match self.apply_step(dir) {
                Ok(_) => done += 1,
                Err(e) => {
                    first_err = Some(e);
                    break;
                }
            }
        }
        if done == 0 {
            return Err(reject("step_repeat", first_err.unwrap_or(Rejected::NoMovement)));
        }
        self.history.record(&self.state);
        self.last_jump = done;
        Ok(GameEvent::Stepped { count: done })
    }

    fn apply_step(&mut self, dir: MoveDir) -> Result<GameEvent, Rejected> {
        let outcome = rules::resolve_step(&self.grid, &self.state, dir)?;
        let event = match outcome {
            StepOutcome::Walk { to } => {
                self.state.player = to;
                GameEvent::Walked { to }
            }
            StepOutcome::Push { to, star, star_to } => {
                self.state.stars[star] = star_to;
                self.state.player = to;
                GameEvent::StarPushed { star, to: star_to }
            }
        };
        self.state.steps = self.state.steps.saturating_add(1);
        Ok(event)
    }
}

// ══════════════════════════════════════════════════════════════
// Click-to-target
// ══════════════════════════════════════════════════════════════

impl WorldState {
    /// Walk the player to `dest` along a shortest interior path.
    /// Only allowed while no star is selected.
    pub fn teleport(&mut self, dest: Cell) -> Result<GameEvent, Rejected> {
        if self.state.selected.is_some() {
            return Err(reject("teleport", Rejected::SelectionActive));
        }
        let obstacles = self.star_obstacles(None);
        let cost = match shortest_path(&self.grid, &obstacles, self.state.player, dest) {
            None => return Err(reject("teleport", Rejected::Unreachable)),
            Some(0) => return Err(reject("teleport", Rejected::NoMovement)),
            Some(d) => d,
        };

        self.state.player = dest;
        self.state.steps = self.state.steps.saturating_add(cost);
        self.history.record(&self.state);
        self.last_jump = cost;
        Ok(GameEvent::Teleported { to: dest, cost })
    }

    /// Push the selected star to `dest` through as many pushes as needed.
    /// The selection survives a successful push.
    pub fn push_selected(&mut self, dest: Cell) -> Result<GameEvent, Rejected> {
        let (Some(star), Some(src)) = (self.state.selected, self.state.selected_cell()) else {
            return Err(reject("push", Rejected::NothingSelected));
        };

        let others = self.star_obstacles(Some(star));
        let plan = plan_push(&self.grid, &others, self.state.player, src, dest)
            .ok_or_else(|| reject("push", Rejected::Unreachable))?;
        if plan.cost == 0 {
            return Err(reject("push", Rejected::NoMovement));
        }

        self.state.stars[star] = dest;
        self.state.player = plan.player;
        self.state.steps = self.state.steps.saturating_add(plan.cost);
        self.history.record(&self.state);
        self.last_jump = plan.cost;
        Ok(GameEvent::StarMoved { star, to: dest, cost: plan.cost })
    }

    /// Select the star at `cell`, or deselect.
    ///
    /// - not a star: clear any selection
    /// - the selected star: deselect
    /// - another star: select it if the player can walk up to it
    pub fn toggle_selection(&mut self, cell: Cell) -> Result<GameEvent, Rejected> {
        let Some(star) = self.state.star_at(cell) else {
            return self.deselect();
        };
        if self.state.selected == Some(star) {
            return self.deselect();
        }

        let obstacles = self.star_obstacles(Some(star));
        if shortest_path(&self.grid, &obstacles, self.state.player, cell).is_none() {
            return Err(reject("select", Rejected::Unreachable));
        }

        self.state.selected = Some(star);
        self.history.record(&self.state);
        Ok(GameEvent::Selected { star })
    }

    fn deselect(&mut self) -> Result<GameEvent, Rejected> {
        if self.state.selected.take().is_none() {
            return Err(reject("deselect", Rejected::NothingSelected));
        }
        self.history.record(&self.state);
        Ok(GameEvent::Deselected)
    }

    /// Mouse click dispatch.
    ///
    ///   star cell         → toggle selection
    ///   free floor        → push the selected star there, else teleport
    ///   wall / off grid   → clear selection
    pub fn click(&mut self, cell: Cell) -> Result<GameEvent, Rejected> {
        if self.state.has_star(cell) {
            return self.toggle_selection(cell);
        }
        if !self.grid.in_bounds(cell) || self.grid.is_wall(cell) {
            return self.deselect();
        }
        if self.state.selected.is_some() {
            self.push_selected(cell)
        } else {
            self.teleport(cell)
        }
    }
}

// ══════════════════════════════════════════════════════════════
// History
// ══════════════════════════════════════════════════════════════

impl WorldState {
    pub fn undo(&mut self) -> Result<GameEvent, Rejected> {
        let prev = self.history.undo(&self.state)
            .ok_or_else(|| reject("undo", Rejected::NothingToUndo))?;
        self.state = prev;
        self.last_jump = 0;
        Ok(GameEvent::Undone)
    }

    pub fn redo(&mut self) -> Result<GameEvent, Rejected> {
        let next = self.history.redo()
            .ok_or_else(|| reject("redo", Rejected::NothingToRedo))?;
        self.state = next;
        self.last_jump = 0;
        Ok(GameEvent::Redone)
    }

    /// Back to the level's starting configuration with a fresh history.
    pub fn reset(&mut self) -> GameEvent {
        self.state = self.start.clone();
        self.history.reset(&self.state);
        self.last_jump = 0;
        GameEvent::Reset
    }
}

fn reject(op: &'static str, why: Rejected) -> Rejected {
    debug!(op, reason = %why, "rejected");
    why
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{parse_pack, Level};

    fn level(map: &str) -> Level {
        parse_pack(map).remove(0).unwrap()
    }

    fn world(map: &str) -> WorldState {
        WorldState::new(&level(map))
    }

    const ROOM: &str = "\
#######
#@    #
#  $  #
#    .#
#######
";

    #[test]
    fn step_walks_and_counts() {
        let mut w = world(ROOM);
        assert_eq!(w.step(MoveDir::Right), Ok(GameEvent::Walked { to: Cell::new(2, 1) }));
        assert_eq!(w.current_state().steps, 1);
        assert_eq!(w.history().past_len(), 2);
    }

    #[test]
    fn step_into_wall_changes_nothing() {
        let mut w = world(ROOM);
        let before = w.current_state().clone();
        assert_eq!(w.step(MoveDir::Up), Err(Rejected::Wall));
        assert_eq!(w.current_state(), &before);
        assert_eq!(w.history().past_len(), 1);
    }

    #[test]
    fn step_pushes_star() {
        let mut w = world("#####\n#@$ #\n#  .#\n#####\n");
        assert_eq!(
            w.step(MoveDir::Right),
            Ok(GameEvent::StarPushed { star: 0, to: Cell::new(3, 1) })
        );
        assert_eq!(w.current_state().player, Cell::new(2, 1));
    }

    #[test]
    fn exterior_floor_is_never_a_search_target() {
        // (5,1) is floor, but walled off from the start at load time.
        let mut w = world("#######\n#@$.# #\n#######\n");
        assert_eq!(w.teleport(Cell::new(5, 1)), Err(Rejected::Unreachable));
        w.toggle_selection(Cell::new(2, 1)).unwrap();
        assert_eq!(w.push_selected(Cell::new(5, 1)), Err(Rejected::Unreachable));
        assert_eq!(w.current_state().steps, 0);
    }

    #[test]
    fn step_repeat_stops_at_wall() {
        let mut w = world(ROOM);
        assert_eq!(w.step_repeat(MoveDir::Right, 100), Ok(GameEvent::Stepped { count: 4 }));
        assert_eq!(w.current_state().player, Cell::new(5, 1));
        assert_eq!(w.current_state().steps, 4);
        assert_eq!(w.last_jump(), 4);
        assert_eq!(w.history().past_len(), 2);
        assert_eq!(w.step_repeat(MoveDir::Right, 5), Err(Rejected::Wall));
    }

    #[test]
    fn teleport_adds_path_length() {
        let mut w = world(ROOM);
        let ev = w.teleport(Cell::new(5, 3)).unwrap();
        assert_eq!(ev, GameEvent::Teleported { to: Cell::new(5, 3), cost: 6 });
        assert_eq!(w.current_state().steps, 6);
        assert_eq!(w.last_jump(), 6);
    }

    #[test]
    fn teleport_rejections() {
        let mut w = world(ROOM);
        let start = w.current_state().player;
        assert_eq!(w.teleport(start), Err(Rejected::NoMovement));
        assert_eq!(w.teleport(Cell::new(3, 2)), Err(Rejected::Unreachable));
        assert_eq!(w.teleport(Cell::new(0, 0)), Err(Rejected::Unreachable));
        w.toggle_selection(Cell::new(3, 2)).unwrap();
        assert_eq!(w.teleport(Cell::new(5, 1)), Err(Rejected::SelectionActive));
        assert_eq!(w.current_state().steps, 0);
    }

    #[test]
    fn select_push_keeps_selection() {
        let mut w = world(ROOM);
        assert_eq!(w.toggle_selection(Cell::new(3, 2)), Ok(GameEvent::Selected { star: 0 }));
        let ev = w.push_selected(Cell::new(4, 2)).unwrap();
        // Walk (1,1)→(2,2) is 2 steps, plus one push.
        assert_eq!(ev, GameEvent::StarMoved { star: 0, to: Cell::new(4, 2), cost: 3 });
        let s = w.current_state();
        assert_eq!(s.stars, vec![Cell::new(4, 2)]);
        assert_eq!(s.player, Cell::new(3, 2));
        assert_eq!(s.selected, Some(0));
        assert_eq!(s.steps, 3);
    }

    #[test]
    fn push_rejections_leave_state() {
        let mut w = world(ROOM);
        assert_eq!(w.push_selected(Cell::new(4, 2)), Err(Rejected::NothingSelected));
        w.toggle_selection(Cell::new(3, 2)).unwrap();
        let before = w.current_state().clone();
        assert_eq!(w.push_selected(Cell::new(3, 2)), Err(Rejected::NoMovement));
        assert_eq!(w.push_selected(Cell::new(0, 0)), Err(Rejected::Unreachable));
        assert_eq!(w.current_state(), &before);
    }

    #[test]
    fn toggle_selection_cases() {
        let mut w = world(ROOM);
        assert_eq!(w.toggle_selection(Cell::new(2, 2)), Err(Rejected::NothingSelected));
        w.toggle_selection(Cell::new(3, 2)).unwrap();
        assert_eq!(w.toggle_selection(Cell::new(3, 2)), Ok(GameEvent::Deselected));
        assert_eq!(w.current_state().selected, None);
        w.toggle_selection(Cell::new(3, 2)).unwrap();
        assert_eq!(w.toggle_selection(Cell::new(2, 2)), Ok(GameEvent::Deselected));
    }

    #[test]
    fn unreachable_star_is_not_selected() {
        // Star at (5,1) sits in a sealed pocket.
        let mut w = world("#######\n#@$ #$#\n#  .#.#\n#######\n");
        assert_eq!(w.toggle_selection(Cell::new(5, 1)), Err(Rejected::Unreachable));
        assert_eq!(w.current_state().selected, None);
    }

    #[test]
    fn click_dispatches() {
        let mut w = world(ROOM);
        assert!(matches!(w.click(Cell::new(5, 1)), Ok(GameEvent::Teleported { .. })));
        assert_eq!(w.click(Cell::new(3, 2)), Ok(GameEvent::Selected { star: 0 }));
        assert!(matches!(w.click(Cell::new(2, 2)), Ok(GameEvent::StarMoved { .. })));
        assert_eq!(w.click(Cell::new(0, 0)), Ok(GameEvent::Deselected));
        assert_eq!(w.click(Cell::new(90, 90)), Err(Rejected::NothingSelected));
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut w = world(ROOM);
        w.step(MoveDir::Right).unwrap();
        w.step(MoveDir::Down).unwrap();
        let before = w.current_state().clone();

        assert_eq!(w.undo(), Ok(GameEvent::Undone));
        assert_eq!(w.current_state().player, Cell::new(2, 1));
        assert_eq!(w.current_state().steps, 1);
        assert_eq!(w.redo(), Ok(GameEvent::Redone));
        assert_eq!(w.current_state(), &before);
        assert_eq!(w.redo(), Err(Rejected::NothingToRedo));
    }

    #[test]
    fn first_state_cannot_be_undone() {
        let mut w = world(ROOM);
        assert_eq!(w.undo(), Err(Rejected::NothingToUndo));
    }

    #[test]
    fn reset_restores_start() {
        let mut w = world(ROOM);
        w.teleport(Cell::new(5, 3)).unwrap();
        w.reset();
        assert_eq!(w.current_state().steps, 0);
        assert_eq!(w.current_state().player, Cell::new(1, 1));
        assert_eq!(w.history().past_len(), 1);
        assert_eq!(w.undo(), Err(Rejected::NothingToUndo));
    }

    #[test]
    fn step_counter_saturates_instead_of_wrapping() {
        let lv = level(ROOM);
        let mut snap = lv.start.clone();
        snap.steps = u32::MAX - 1;
        let mut w = WorldState::restore(&lv, snap, 300).unwrap();

        w.step(MoveDir::Right).unwrap();
        assert_eq!(w.current_state().steps, u32::MAX);
        w.step(MoveDir::Right).unwrap();
        w.teleport(Cell::new(5, 3)).unwrap();
        w.toggle_selection(Cell::new(3, 2)).unwrap();
        w.push_selected(Cell::new(2, 2)).unwrap();
        assert_eq!(w.current_state().steps, u32::MAX);
    }

    #[test]
    fn completion_only_after_last_star_lands() {
        let mut w = world("######\n#@$ .#\n######\n");
        w.step(MoveDir::Right).unwrap();
        assert!(!w.is_complete());
        w.step(MoveDir::Right).unwrap();
        assert!(w.is_complete());
    }
}
