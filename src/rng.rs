//! Seedable colour picker for board generation and refills.

use crate::grid::TileColor;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8-backed RNG. The same seed always produces the same boards and refills.
#[derive(Debug, Clone)]
pub struct TileRng {
    inner: ChaCha8Rng,
}

impl TileRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniform pick over the palette, repeats allowed.
    pub fn pick(&mut self, palette: &[TileColor]) -> TileColor {
        palette.choose(&mut self.inner).copied().unwrap_or(TileColor::Red)
    }

    /// Uniform pick over the palette without `current`. With a single-colour palette
    /// there is nothing else to pick and `current` comes back.
    pub fn pick_except(&mut self, palette: &[TileColor], current: TileColor) -> TileColor {
        let others: Vec<TileColor> = palette.iter().copied().filter(|&c| c != current).collect();
        if others.is_empty() {
            return current;
        }
        others[self.inner.gen_range(0..others.len())]
    }
}
