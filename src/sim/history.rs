/// Bounded undo/redo history over `PuzzleState` snapshots.
///
/// ## Stacks
///   - `past`: recorded snapshots, oldest first, at most `limit` entries.
///   - `future`: snapshots undone since the last ordinary record.
///
/// ## Coalescing
/// A snapshot is appended only when the player cell or the selection differs
/// from the newest entry. A mutation that changes neither (for instance a
/// push that returns the player to where it started) is not a new entry.
///
/// ## Undo / redo
/// `undo` moves the live state onto `future` and drops the newest entry;
/// the entry below it becomes current. The oldest entry is never undone.
/// `redo` pops `future` and appends it to `past` without clearing `future`.

use std::collections::VecDeque;

use crate::domain::entity::PuzzleState;

pub const DEFAULT_HISTORY_LIMIT: usize = 300;

#[derive(Clone, Debug)]
pub struct History {
    past: VecDeque<PuzzleState>,
    future: Vec<PuzzleState>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        History {
            past: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT) + 1),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state after an ordinary mutation. Clears `future`.
    /// Returns true if a new entry was appended.
    pub fn record(&mut self, state: &PuzzleState) -> bool {
        self.future.clear();
        self.append(state)
    }

    /// Step back. `current` is the live state, which may differ from the
    /// newest entry when its change was coalesced away.
    pub fn undo(&mut self, current: &PuzzleState) -> Option<PuzzleState> {
        if self.past.len() <= 1 { return None; }
        self.future.push(current.clone());
        self.past.pop_back();
        self.past.back().cloned()
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self) -> Option<PuzzleState> {
        let next = self.future.pop()?;
        self.append(&next);
        Some(next)
    }

    /// Drop everything and start over from `state`.
    pub fn reset(&mut self, state: &PuzzleState) {
        self.past.clear();
        self.future.clear();
        self.append(state);
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[cfg(test)]
    fn future_len(&self) -> usize {
        self.future.len()
    }

    fn append(&mut self, state: &PuzzleState) -> bool {
        let differs = self.past.back().map_or(true, |top| {
            top.player != state.player || top.selected != state.selected
        });
        if !differs { return false; }

        self.past.push_back(state.clone());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        true
    }
}
