//! Match detection: runs of three or more equal colours along rows and columns.

use crate::grid::{Coord, Grid, Tile};

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Deduplicated cells belonging to at least one run, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    tiles: Vec<Tile>,
    marked: Vec<bool>,
    size: usize,
}

impl MatchSet {
    fn new(size: usize) -> Self {
        Self {
            tiles: Vec::new(),
            marked: vec![false; size * size],
            size,
        }
    }

    /// Add the tile at `c` unless it is already part of the set.
    fn mark(&mut self, grid: &Grid, c: Coord) {
        let i = c.y * self.size + c.x;
        if self.marked[i] {
            return;
        }
        if let Some(tile) = grid.get(c) {
            self.marked[i] = true;
            self.tiles.push(tile);
        }
    }

    #[cfg(test)]
    pub fn contains(&self, c: Coord) -> bool {
        c.x < self.size && c.y < self.size && self.marked[c.y * self.size + c.x]
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Matched tiles as they were at detection time.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tiles.iter().map(|t| t.pos)
    }
}

/// Scan every row (left to right) then every column (top to bottom) for runs of
/// `MIN_RUN` or more. Empty slots never match. The grid is not modified.
pub fn find_matches(grid: &Grid) -> MatchSet {
    let n = grid.size();
    let mut set = MatchSet::new(n);
    for y in 0..n {
        scan_line(grid, &mut set, (0..n).map(|x| Coord::new(x, y)));
    }
    for x in 0..n {
        scan_line(grid, &mut set, (0..n).map(|y| Coord::new(x, y)));
    }
    set
}

fn scan_line(grid: &Grid, set: &mut MatchSet, line: impl Iterator<Item = Coord>) {
    let mut streak: Vec<Coord> = Vec::new();
    for c in line {
        let color = grid.color_at(c);
        let continues = color.is_some()
            && streak
                .last()
                .is_some_and(|&prev| grid.color_at(prev) == color);
        if !continues {
            flush(grid, set, &streak);
            streak.clear();
        }
        if color.is_some() {
            streak.push(c);
        }
    }
    // A run touching the last slot has not been flushed yet.
    flush(grid, set, &streak);
}

fn flush(grid: &Grid, set: &mut MatchSet, streak: &[Coord]) {
    if streak.len() >= MIN_RUN {
        for &c in streak {
            set.mark(grid, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileColor;
    use crate::grid::tests::{grid_from_rows, striped_grid};

    fn coords(set: &MatchSet) -> Vec<(usize, usize)> {
        let mut v: Vec<_> = set.coords().map(|c| (c.x, c.y)).collect();
        v.sort_unstable();
        v
    }

    fn paint(grid: &mut Grid, cells: &[(usize, usize)], color: TileColor) {
        for &(x, y) in cells {
            grid.recolor(Coord::new(x, y), color);
        }
    }

    #[test]
    fn striped_board_has_no_matches() {
        for size in 3..=10 {
            assert!(find_matches(&striped_grid(size)).is_empty(), "size {size}");
        }
    }

    #[test]
    fn row_of_three() {
        let mut grid = striped_grid(8);
        paint(&mut grid, &[(0, 0), (1, 0), (2, 0)], TileColor::Red);
        paint(&mut grid, &[(3, 0)], TileColor::Blue);
        paint(&mut grid, &[(4, 0)], TileColor::Green);
        assert_eq!(coords(&find_matches(&grid)), vec![(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn run_of_four_is_not_capped() {
        let mut grid = striped_grid(8);
        paint(&mut grid, &[(0, 0), (1, 0), (2, 0), (3, 0)], TileColor::Red);
        paint(&mut grid, &[(4, 0)], TileColor::Green);
        assert_eq!(
            coords(&find_matches(&grid)),
            vec![(0, 0), (1, 0), (2, 0), (3, 0)]
        );
    }

    #[test]
    fn trailing_run_is_flushed() {
        let mut grid = striped_grid(8);
        paint(&mut grid, &[(5, 0), (6, 0), (7, 0)], TileColor::Yellow);
        assert_eq!(coords(&find_matches(&grid)), vec![(5, 0), (6, 0), (7, 0)]);

        let mut grid = striped_grid(8);
        paint(&mut grid, &[(7, 5), (7, 6), (7, 7)], TileColor::Cyan);
        assert_eq!(coords(&find_matches(&grid)), vec![(7, 5), (7, 6), (7, 7)]);
    }

    #[test]
    fn vertical_run() {
        let grid = grid_from_rows(&["RBG", "RGB", "RBG"]);
        assert_eq!(coords(&find_matches(&grid)), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn l_shape_counts_shared_cell_once() {
        let grid = grid_from_rows(&["RRRB", "RGBG", "RBGB", "GYPY"]);
        let set = find_matches(&grid);
        assert_eq!(set.len(), 5);
        assert_eq!(
            coords(&set),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)]
        );
        assert!(set.contains(Coord::new(0, 0)));
        assert!(!set.contains(Coord::new(3, 0)));
    }

    #[test]
    fn plus_shape_counts_centre_once() {
        let grid = grid_from_rows(&["BRB", "RRR", "BRB"]);
        assert_eq!(find_matches(&grid).len(), 5);
    }

    #[test]
    fn two_runs_in_one_row() {
        let grid = grid_from_rows(&[
            "RRRBBBG", "GBGYGYB", "BGYGYGR", "YPBPBPY", "GYGYGYG", "PBPBPBP", "YGYGYGY",
        ]);
        assert_eq!(find_matches(&grid).len(), 6);
    }

    #[test]
    fn empty_slots_never_match() {
        let grid = grid_from_rows(&["...", "RR.", "BGB"]);
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn empty_slot_breaks_a_run() {
        let grid = grid_from_rows(&["RR.RR", "GBGBG", "BGBGB", "GBGBG", "BGBGB"]);
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn detection_does_not_mutate() {
        let grid = grid_from_rows(&["RRR", "GBG", "BGB"]);
        let before = grid.clone();
        let set = find_matches(&grid);
        assert_eq!(grid, before);
        assert_eq!(set.tiles()[0].color, TileColor::Red);
    }
}
