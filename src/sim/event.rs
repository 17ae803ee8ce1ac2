/// Events emitted by successful engine operations.
/// The presentation layer consumes these for the HUD and messages.

use crate::domain::entity::{Cell, StarId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Walked { to: Cell },
    Stepped { count: u32 },
    StarPushed { star: StarId, to: Cell },
    Teleported { to: Cell, cost: u32 },
    StarMoved { star: StarId, to: Cell, cost: u32 },
    Selected { star: StarId },
    Deselected,
    Undone,
    Redone,
    Reset,
}
