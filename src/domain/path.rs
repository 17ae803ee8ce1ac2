/// Reachability engine: BFS shortest path over interior floor.
///
/// Terrain = what the cell IS (only `InteriorFloor` is searchable).
/// Occupancy = the obstacle set supplied per call (usually stars).
///
/// `src` is never disqualified by the obstacle set; `dest` is.

use std::collections::{HashSet, VecDeque};

use super::entity::Cell;
use super::grid::Grid;

/// Cells a single search treats as impassable.
pub type ObstacleSet = HashSet<Cell>;

/// Length of a shortest 4-connected path from `src` to `dest`, or None.
pub fn shortest_path(grid: &Grid, obstacles: &ObstacleSet, src: Cell, dest: Cell) -> Option<u32> {
    if !grid.is_interior(src) || !grid.is_interior(dest) { return None; }
    if obstacles.contains(&dest) { return None; }
    if src == dest { return Some(0); }

    let mut visited = vec![vec![false; grid.width()]; grid.height()];
    visited[src.y][src.x] = true;

    let mut queue: VecDeque<(Cell, u32)> = VecDeque::with_capacity(64);
    queue.push_back((src, 0));

    while let Some((cell, dist)) = queue.pop_front() {
        for next in grid.neighbors(cell) {
            if visited[next.y][next.x] { continue; }
            if !grid.is_interior(next) || obstacles.contains(&next) { continue; }
            if next == dest { return Some(dist + 1); }
            visited[next.y][next.x] = true;
            queue.push_back((next, dist + 1));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::tests::grid_from;
    use proptest::prelude::*;

    fn none() -> ObstacleSet {
        ObstacleSet::new()
    }

    #[test]
    fn corridor_distance() {
        let (g, start) = grid_from(&["@    "]);
        assert_eq!(shortest_path(&g, &none(), start, Cell::new(4, 0)), Some(4));
    }

    #[test]
    fn same_cell_is_zero() {
        let (g, start) = grid_from(&["@ "]);
        assert_eq!(shortest_path(&g, &none(), start, start), Some(0));
    }

    #[test]
    fn detours_around_walls() {
        let (g, start) = grid_from(&[
            "#######",
            "#@ #  #",
            "#     #",
            "#######",
        ]);
        // Down, right x3, up = 5 (straight line blocked at x=3).
        assert_eq!(shortest_path(&g, &none(), start, Cell::new(4, 1)), Some(5));
    }

    #[test]
    fn obstacle_blocks_corridor() {
        let (g, start) = grid_from(&["@    "]);
        let obstacles: ObstacleSet = [Cell::new(2, 0)].into_iter().collect();
        assert_eq!(shortest_path(&g, &obstacles, start, Cell::new(4, 0)), None);
    }

    #[test]
    fn obstacle_on_dest_is_unreachable_but_not_on_src() {
        let (g, start) = grid_from(&["@    "]);
        let on_dest: ObstacleSet = [Cell::new(3, 0)].into_iter().collect();
        assert_eq!(shortest_path(&g, &on_dest, start, Cell::new(3, 0)), None);
        let on_src: ObstacleSet = [start].into_iter().collect();
        assert_eq!(shortest_path(&g, &on_src, start, Cell::new(3, 0)), Some(3));
    }

    #[test]
    fn exterior_cells_are_never_reachable() {
        let (g, start) = grid_from(&[
            "#####   ",
            "#@  #   ",
            "#####   ",
        ]);
        assert_eq!(shortest_path(&g, &none(), start, Cell::new(6, 1)), None);
        assert_eq!(shortest_path(&g, &none(), Cell::new(6, 1), Cell::new(7, 1)), None);
        assert_eq!(shortest_path(&g, &none(), Cell::new(0, 0), start), None);
    }

    const ROOM: [&str; 6] = [
        "#########",
        "#@  #   #",
        "# #   # #",
        "#   #   #",
        "# #   # #",
        "#########",
    ];

    proptest! {
        #[test]
        fn distance_is_symmetric(
            ax in 0usize..9, ay in 0usize..6,
            bx in 0usize..9, by in 0usize..6,
            ox in 0usize..9, oy in 0usize..6,
        ) {
            let (g, _) = grid_from(&ROOM);
            let obstacles: ObstacleSet = [Cell::new(ox, oy)].into_iter().collect();
            let a = Cell::new(ax, ay);
            let b = Cell::new(bx, by);
            // The exemption for src makes an obstacle on an endpoint asymmetric.
            prop_assume!(!obstacles.contains(&a) && !obstacles.contains(&b));
            prop_assert_eq!(
                shortest_path(&g, &obstacles, a, b),
                shortest_path(&g, &obstacles, b, a)
            );
        }

        #[test]
        fn distance_to_self_is_zero(x in 0usize..9, y in 0usize..6) {
            let (g, _) = grid_from(&ROOM);
            let c = Cell::new(x, y);
            let expected = if g.is_interior(c) { Some(0) } else { None };
            prop_assert_eq!(shortest_path(&g, &ObstacleSet::new(), c, c), expected);
        }
    }
}
