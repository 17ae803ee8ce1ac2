/// Push solver: relocate one star to a target cell through a series of
/// single-cell pushes, walking the player around to each push-origin.
///
/// ## Search
///
/// BFS whose nodes are star cells only (not joint star+player states).
/// From star cell `p`, pushing in direction `d` moves the star to `p + d`
/// and needs the player on the push-origin `p - d`. The player's walk to
/// the push-origin is a nested `shortest_path` with every other star and
/// the moving star (at `p`) as obstacles.
///
/// Visited is keyed by star cell and marked on enqueue: a later arrival at
/// the same star cell with a different player position is dropped. This
/// approximation is kept as-is; a joint search would change which targets
/// are reachable and what they cost.

use std::collections::{HashSet, VecDeque};

use super::entity::{Cell, MoveDir};
use super::grid::Grid;
use super::path::{shortest_path, ObstacleSet};

/// Neighbor expansion order. With visited marked on enqueue, the first
/// direction to reach a star cell fixes its cost and the player's cell.
const EXPANSION: [MoveDir; 4] = [MoveDir::Left, MoveDir::Up, MoveDir::Down, MoveDir::Right];

/// Outcome of a successful plan.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PushPlan {
    /// Player walking steps plus one per push.
    pub cost: u32,
    /// Where the player ends up: the cell the star last vacated.
    pub player: Cell,
}

/// Plan moving the star at `star_src` to `dest`, starting with the player at
/// `player`. `others` holds every other star and must not contain `star_src`.
pub fn plan_push(
    grid: &Grid,
    others: &ObstacleSet,
    player: Cell,
    star_src: Cell,
    dest: Cell,
) -> Option<PushPlan> {
    if !grid.is_interior(dest) || others.contains(&dest) { return None; }

    let mut visited: HashSet<Cell> = HashSet::with_capacity(64);
    visited.insert(star_src);

    let mut queue: VecDeque<(Cell, u32, Cell)> = VecDeque::with_capacity(64);
    queue.push_back((star_src, 0, player));

    // Scratch obstacle set: `others` plus the moving star's current cell.
    let mut blocked = others.clone();

    while let Some((star, cost, walker)) = queue.pop_front() {
        if star == dest {
            return Some(PushPlan { cost, player: walker });
        }

        for dir in EXPANSION {
            let Some(next) = grid.step(star, dir) else { continue };
            if visited.contains(&next) { continue; }
            if !grid.is_interior(next) || others.contains(&next) { continue; }
            let Some(origin) = grid.step(star, dir.opposite()) else { continue };

            blocked.insert(star);
            let walk = shortest_path(grid, &blocked, walker, origin);
            blocked.remove(&star);

            if let Some(walk) = walk {
                visited.insert(next);
                queue.push_back((next, cost + walk + 1, star));
            }
        }
    }

    None
}
