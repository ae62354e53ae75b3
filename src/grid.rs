//! Grid model: square arena of tiles indexed by coordinate, y=0 is top.

/// Grid coordinate: `x` is the column, `y` the row (0 = top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn distance(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Orthogonal neighbours only; diagonals are not adjacent.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }
}

/// Tile colours. The default game uses the first five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Cyan,
}

impl TileColor {
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Cyan,
    ];

    /// Palette of the first `count` colours (clamped to 1..=6).
    pub fn palette(count: usize) -> &'static [Self] {
        &Self::ALL[..count.clamp(1, Self::ALL.len())]
    }

    /// Index into the theme's tile colours.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A tile occupying one slot. `pos` mirrors the slot it sits in and is re-stamped by
/// every grid write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub color: TileColor,
    pub pos: Coord,
}

impl Tile {
    pub const fn new(color: TileColor, pos: Coord) -> Self {
        Self { color, pos }
    }
}

/// Square playfield of `size * size` slots, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Empty grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Grid with every slot filled by `color_at(coord)`.
    pub fn filled_with(size: usize, mut color_at: impl FnMut(Coord) -> TileColor) -> Self {
        let mut grid = Self::new(size);
        for c in grid.coords() {
            grid.set(c, Some(Tile::new(color_at(c), c)));
        }
        grid
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, c: Coord) -> Option<usize> {
        (c.x < self.size && c.y < self.size).then(|| c.y * self.size + c.x)
    }

    /// All coordinates, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Coord::new(x, y)))
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Option<Tile> {
        self.index(c).and_then(|i| self.cells[i])
    }

    #[inline]
    pub fn color_at(&self, c: Coord) -> Option<TileColor> {
        self.get(c).map(|t| t.color)
    }

    /// Overwrite a slot. A present tile is stamped with `c`.
    ///
    /// Panics if `c` is outside the grid.
    pub fn set(&mut self, c: Coord, tile: Option<Tile>) {
        let i = self
            .index(c)
            .unwrap_or_else(|| panic!("({}, {}) outside {}x{} grid", c.x, c.y, self.size, self.size));
        self.cells[i] = tile.map(|t| Tile { pos: c, ..t });
    }

    /// Empty a slot, returning what was there.
    pub fn take(&mut self, c: Coord) -> Option<Tile> {
        let tile = self.get(c);
        self.set(c, None);
        tile
    }

    /// Recolour the tile at `c`; no-op on an empty slot.
    pub fn recolor(&mut self, c: Coord, color: TileColor) {
        if let Some(tile) = self.get(c) {
            self.set(c, Some(Tile { color, ..tile }));
        }
    }

    /// Exchange two slots (and their stamped coordinates).
    pub fn swap(&mut self, a: Coord, b: Coord) {
        let ta = self.get(a);
        let tb = self.get(b);
        self.set(a, tb);
        self.set(b, ta);
    }

    /// Gravity for one column: every tile falls by the number of empty slots below it.
    /// Returns `(from, to)` for each tile that moved, bottom-most first. Empty slots end up
    /// at the top of the column.
    pub fn compact_column(&mut self, x: usize) -> Vec<(Coord, Coord)> {
        let mut moves = Vec::new();
        let mut empty = 0;
        for y in (0..self.size).rev() {
            let from = Coord::new(x, y);
            match self.get(from) {
                None => empty += 1,
                Some(tile) if empty > 0 => {
                    let to = Coord::new(x, y + empty);
                    self.set(to, Some(tile));
                    self.set(from, None);
                    moves.push((from, to));
                }
                Some(_) => {}
            }
        }
        moves
    }

    /// Number of empty slots in column `x` (all at the top once compacted).
    pub fn empty_in_column(&self, x: usize) -> usize {
        (0..self.size)
            .filter(|&y| self.get(Coord::new(x, y)).is_none())
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// True if any column has a tile sitting above an empty slot.
    pub fn has_gaps(&self) -> bool {
        (0..self.size).any(|x| {
            let mut seen_tile = false;
            for y in 0..self.size {
                match self.get(Coord::new(x, y)) {
                    Some(_) => seen_tile = true,
                    None if seen_tile => return true,
                    None => {}
                }
            }
            false
        })
    }

    /// Every stored tile's `pos` matches the slot it occupies.
    #[cfg(test)]
    pub fn positions_consistent(&self) -> bool {
        self.coords()
            .all(|c| self.get(c).is_none_or(|t| t.pos == c))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Parse rows of colour letters (R B G Y P C, '.' for empty) into a square grid.
    pub(crate) fn grid_from_rows(rows: &[&str]) -> Grid {
        let size = rows.len();
        let mut grid = Grid::new(size);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "row {y} is not {size} wide");
            for (x, ch) in row.chars().enumerate() {
                let color = match ch {
                    'R' => Some(TileColor::Red),
                    'B' => Some(TileColor::Blue),
                    'G' => Some(TileColor::Green),
                    'Y' => Some(TileColor::Yellow),
                    'P' => Some(TileColor::Purple),
                    'C' => Some(TileColor::Cyan),
                    '.' => None,
                    other => panic!("unknown tile letter {other:?}"),
                };
                let c = Coord::new(x, y);
                grid.set(c, color.map(|color| Tile::new(color, c)));
            }
        }
        grid
    }

    /// Match-free board: neighbours differ by 1 (horizontally) or 2 (vertically) mod 5.
    pub(crate) fn striped_grid(size: usize) -> Grid {
        Grid::filled_with(size, |c| TileColor::ALL[(c.x + 2 * c.y) % 5])
    }

    #[test]
    fn adjacency_is_orthogonal_only() {
        let c = Coord::new(3, 3);
        assert!(c.is_adjacent(Coord::new(2, 3)));
        assert!(c.is_adjacent(Coord::new(3, 4)));
        assert!(!c.is_adjacent(Coord::new(4, 4)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(5, 3)));
    }

    #[test]
    fn set_stamps_position() {
        let mut grid = Grid::new(4);
        let stale = Tile::new(TileColor::Red, Coord::new(0, 0));
        grid.set(Coord::new(2, 1), Some(stale));
        assert_eq!(grid.get(Coord::new(2, 1)).map(|t| t.pos), Some(Coord::new(2, 1)));
        assert!(grid.positions_consistent());
    }

    #[test]
    fn get_out_of_range_is_none() {
        let grid = striped_grid(4);
        assert_eq!(grid.get(Coord::new(4, 0)), None);
        assert_eq!(grid.get(Coord::new(0, 9)), None);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn set_out_of_range_panics() {
        let mut grid = Grid::new(3);
        grid.set(Coord::new(3, 0), None);
    }

    #[test]
    fn swap_exchanges_tiles_and_positions() {
        let mut grid = grid_from_rows(&["RB.", "...", "..."]);
        grid.swap(Coord::new(0, 0), Coord::new(1, 0));
        assert_eq!(grid.color_at(Coord::new(0, 0)), Some(TileColor::Blue));
        assert_eq!(grid.color_at(Coord::new(1, 0)), Some(TileColor::Red));
        assert!(grid.positions_consistent());

        grid.swap(Coord::new(1, 0), Coord::new(2, 0));
        assert_eq!(grid.get(Coord::new(1, 0)), None);
        assert_eq!(grid.color_at(Coord::new(2, 0)), Some(TileColor::Red));
    }

    #[test]
    fn compact_column_example() {
        // Column 0 top to bottom: empty, red, empty, blue.
        let mut grid = grid_from_rows(&["....", "R...", "....", "B..."]);
        let moves = grid.compact_column(0);
        assert_eq!(moves, vec![(Coord::new(0, 1), Coord::new(0, 2))]);
        assert_eq!(grid.get(Coord::new(0, 0)), None);
        assert_eq!(grid.get(Coord::new(0, 1)), None);
        assert_eq!(grid.color_at(Coord::new(0, 2)), Some(TileColor::Red));
        assert_eq!(grid.color_at(Coord::new(0, 3)), Some(TileColor::Blue));
        assert_eq!(grid.empty_in_column(0), 2);
        assert!(!grid.has_gaps());
        assert!(grid.positions_consistent());
    }

    #[test]
    fn compact_column_keeps_order() {
        let mut grid = grid_from_rows(&["R....", "B....", ".....", "G....", "....."]);
        grid.compact_column(0);
        assert_eq!(grid.color_at(Coord::new(0, 2)), Some(TileColor::Red));
        assert_eq!(grid.color_at(Coord::new(0, 3)), Some(TileColor::Blue));
        assert_eq!(grid.color_at(Coord::new(0, 4)), Some(TileColor::Green));
    }

    #[test]
    fn has_gaps_detects_floating_tile() {
        let grid = grid_from_rows(&["R..", "...", "B.."]);
        assert!(grid.has_gaps());
        let settled = grid_from_rows(&["...", "R..", "B.."]);
        assert!(!settled.has_gaps());
        assert!(!striped_grid(5).has_gaps());
    }

    #[test]
    fn recolor_keeps_position() {
        let mut grid = striped_grid(3);
        grid.recolor(Coord::new(1, 1), TileColor::Cyan);
        assert_eq!(grid.color_at(Coord::new(1, 1)), Some(TileColor::Cyan));
        assert!(grid.positions_consistent());
    }

    #[test]
    fn palette_is_clamped() {
        assert_eq!(TileColor::palette(5).len(), 5);
        assert_eq!(TileColor::palette(0).len(), 1);
        assert_eq!(TileColor::palette(99).len(), 6);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_column(size: usize) -> impl Strategy<Value = Vec<Option<u8>>> {
            proptest::collection::vec(proptest::option::of(0u8..5), size)
        }

        proptest! {
            #[test]
            fn compaction_settles_column(column in arb_column(8)) {
                let mut grid = Grid::new(8);
                for (y, cell) in column.iter().enumerate() {
                    let c = Coord::new(3, y);
                    grid.set(c, cell.map(|i| Tile::new(TileColor::ALL[i as usize], c)));
                }
                let before: Vec<TileColor> = column
                    .iter()
                    .flatten()
                    .map(|&i| TileColor::ALL[i as usize])
                    .collect();
                grid.compact_column(3);
                prop_assert!(!grid.has_gaps());
                prop_assert!(grid.positions_consistent());
                let after: Vec<TileColor> = (0..8)
                    .filter_map(|y| grid.color_at(Coord::new(3, y)))
                    .collect();
                prop_assert_eq!(after, before);
            }

            #[test]
            fn adjacency_is_symmetric(ax in 0usize..8, ay in 0usize..8, bx in 0usize..8, by in 0usize..8) {
                let (a, b) = (Coord::new(ax, ay), Coord::new(bx, by));
                prop_assert_eq!(a.is_adjacent(b), b.is_adjacent(a));
                prop_assert_eq!(a.is_adjacent(b), ax.abs_diff(bx) + ay.abs_diff(by) == 1);
            }
        }
    }
}
