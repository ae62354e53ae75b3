//! Startup options that shape a game session.

use thiserror::Error;

pub const DEFAULT_GRID_SIZE: usize = 8;
pub const DEFAULT_COLORS: usize = 5;
pub const DEFAULT_MOVES: u32 = 30;

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 16;

/// Options derived from the CLI that affect the board and bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: usize,
    /// Number of tile colours in play.
    pub colors: usize,
    pub starting_moves: u32,
    /// Fixed seed for reproducible boards; random when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            colors: DEFAULT_COLORS,
            starting_moves: DEFAULT_MOVES,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size {0} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSize(usize),
    #[error("need between 2 and 6 colours, got {0}")]
    Colors(usize),
    #[error("starting moves must be at least 1")]
    NoMoves,
}

impl GameConfig {
    /// Reject configurations the engine can't play. A single colour would make the
    /// starting-board recolouring loop forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if !(2..=6).contains(&self.colors) {
            return Err(ConfigError::Colors(self.colors));
        }
        if self.starting_moves == 0 {
            return Err(ConfigError::NoMoves);
        }
        Ok(())
    }
}
