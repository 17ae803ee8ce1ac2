/// Grid classifier: turns a raw wall/floor map into classified tiles.
///
/// ## Interior vs exterior
///
/// Classification runs once, from the player's *initial* cell:
///   - floor flood-reached (4-connected) from the start → `InteriorFloor`
///   - every other floor cell → `ExteriorFloor`, permanently
///
/// The grid is never mutated afterwards, so a region that later becomes
/// reachable by direct stepping still stays off-limits to searches.
///
/// ## Corner walls
///
/// A wall with an L-shaped pair of wall neighbours (up+right, right+down,
/// down+left, left+up) becomes `CornerWall`. Rendering only.

use super::entity::{Cell, MoveDir};
use super::tile::Tile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Classify a raw map. `walls[y][x] == true` marks a wall; every other
    /// cell is floor. Rows must all have the same length.
    pub fn classify(walls: &[Vec<bool>], start: Cell) -> Grid {
        let height = walls.len();
        let width = walls.first().map_or(0, |r| r.len());
        let is_wall = |x: isize, y: isize| -> bool {
            if x < 0 || y < 0 { return false; }
            let (x, y) = (x as usize, y as usize);
            y < height && x < width && walls[y][x]
        };

        let mut tiles = vec![vec![Tile::ExteriorFloor; width]; height];
        for y in 0..height {
            for x in 0..width {
                if !walls[y][x] { continue; }
                let (ix, iy) = (x as isize, y as isize);
                let up = is_wall(ix, iy - 1);
                let right = is_wall(ix + 1, iy);
                let down = is_wall(ix, iy + 1);
                let left = is_wall(ix - 1, iy);
                let corner = (up && right) || (right && down) || (down && left) || (left && up);
                tiles[y][x] = if corner { Tile::CornerWall } else { Tile::Wall };
            }
        }

        let mut grid = Grid { tiles, width, height };
        grid.flood_interior(start);
        grid
    }

    /// Iterative flood fill from `start`, relabeling reached floor as interior.
    fn flood_interior(&mut self, start: Cell) {
        if self.tile(start) != Tile::ExteriorFloor { return; }

        let mut stack = Vec::with_capacity(64);
        self.tiles[start.y][start.x] = Tile::InteriorFloor;
        stack.push(start);

        while let Some(cell) = stack.pop() {
            let around: Vec<Cell> = self.neighbors(cell).collect();
            for next in around {
                if self.tiles[next.y][next.x] == Tile::ExteriorFloor {
                    self.tiles[next.y][next.x] = Tile::InteriorFloor;
                    stack.push(next);
                }
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Tile at `cell`. Out of bounds = wall.
    #[inline]
    pub fn tile(&self, cell: Cell) -> Tile {
        if self.in_bounds(cell) {
            self.tiles[cell.y][cell.x]
        } else {
            Tile::Wall
        }
    }

    #[inline]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.tile(cell).is_wall()
    }

    #[inline]
    pub fn is_interior(&self, cell: Cell) -> bool {
        self.tile(cell).is_searchable()
    }

    /// In-bounds neighbor in `dir`.
    #[inline]
    pub fn step(&self, cell: Cell, dir: MoveDir) -> Option<Cell> {
        cell.offset(dir).filter(|c| self.in_bounds(*c))
    }

    /// In-bounds 4-neighbors of `cell`.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        MoveDir::ALL.into_iter().filter_map(move |dir| self.step(cell, dir))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build wall mask + start from ASCII rows: '#' wall, '@' start, else floor.
    pub(crate) fn grid_from(rows: &[&str]) -> (Grid, Cell) {
        let mut start = Cell::new(0, 0);
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let walls: Vec<Vec<bool>> = rows.iter().enumerate().map(|(y, row)| {
            let mut line = vec![false; width];
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => line[x] = true,
                    '@' => start = Cell::new(x, y),
                    _ => {}
                }
            }
            line
        }).collect();
        (Grid::classify(&walls, start), start)
    }

    #[test]
    fn flood_marks_enclosed_floor_interior() {
        let (g, _) = grid_from(&[
            "       ",
            " ##### ",
            " #@  # ",
            " ##### ",
        ]);
        assert_eq!(g.tile(Cell::new(2, 2)), Tile::InteriorFloor);
        assert_eq!(g.tile(Cell::new(4, 2)), Tile::InteriorFloor);
        assert_eq!(g.tile(Cell::new(0, 0)), Tile::ExteriorFloor);
        assert_eq!(g.tile(Cell::new(6, 3)), Tile::ExteriorFloor);
    }

    #[test]
    fn disconnected_pocket_stays_exterior() {
        let (g, _) = grid_from(&[
            "#######",
            "#@ # .#",
            "#######",
        ]);
        assert!(g.is_interior(Cell::new(2, 1)));
        assert!(!g.is_interior(Cell::new(4, 1)));
        assert_eq!(g.tile(Cell::new(5, 1)), Tile::ExteriorFloor);
    }

    #[test]
    fn corner_walls_detected() {
        let (g, _) = grid_from(&[
            "###",
            "#@#",
            "###",
        ]);
        // Top-left: right + down are walls.
        assert_eq!(g.tile(Cell::new(0, 0)), Tile::CornerWall);
        // Top-middle: left + right only, no L pair.
        assert_eq!(g.tile(Cell::new(1, 0)), Tile::Wall);
        assert!(g.is_wall(Cell::new(1, 0)));
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let (g, _) = grid_from(&["@"]);
        assert!(g.is_wall(Cell::new(5, 5)));
        assert!(!g.is_interior(Cell::new(1, 0)));
        assert_eq!(g.neighbors(Cell::new(0, 0)).count(), 0);
    }

    #[test]
    fn large_open_grid_floods_without_recursion() {
        let row = " ".repeat(400);
        let mut rows: Vec<&str> = vec![row.as_str(); 400];
        let first = format!("@{}", " ".repeat(399));
        rows[0] = first.as_str();
        let (g, _) = grid_from(&rows);
        assert!(g.is_interior(Cell::new(399, 399)));
    }
}
