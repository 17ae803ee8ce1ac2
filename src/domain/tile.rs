/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// Two walkability predicates, kept separate:
///   - `is_steppable`: direct single-step movement (anything but a wall)
///   - `is_searchable`: pathfinding and push planning (interior floor only)

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    CornerWall,    // Wall adjoined by an L-shaped pair of walls (cosmetic)
    InteriorFloor, // Flood-reached from the level's start cell
    ExteriorFloor, // Floor outside the start cell's region
}

impl Tile {
    /// Is this any kind of wall? Corner walls behave exactly like walls.
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall | Tile::CornerWall)
    }

    /// Can the player walk onto this tile with a direct step?
    pub fn is_steppable(self) -> bool {
        !self.is_wall()
    }

    /// May searches (teleport, push planning, selection) traverse this tile?
    pub fn is_searchable(self) -> bool {
        matches!(self, Tile::InteriorFloor)
    }
}
