//! Fair starting board: no matches before the player's first move.

use crate::grid::{Grid, TileColor};
use crate::matcher::find_matches;
use crate::rng::TileRng;

/// Fill every slot with a random colour, then remove any accidental matches.
pub fn random_board(size: usize, palette: &[TileColor], rng: &mut TileRng) -> Grid {
    let mut grid = Grid::filled_with(size, |_| rng.pick(palette));
    let passes = remove_initial_matches(&mut grid, palette, rng);
    log::debug!("fair {size}x{size} board after {passes} recolour passes");
    grid
}

/// Recolour matched tiles (always to a different colour) until detection comes back
/// empty. Returns the number of recolour passes. Needs at least two colours to
/// terminate.
pub fn remove_initial_matches(grid: &mut Grid, palette: &[TileColor], rng: &mut TileRng) -> usize {
    let mut passes = 0;
    loop {
        let matches = find_matches(grid);
        if matches.is_empty() {
            return passes;
        }
        for tile in matches.tiles() {
            grid.recolor(tile.pos, rng.pick_except(palette, tile.color));
        }
        passes += 1;
    }
}
