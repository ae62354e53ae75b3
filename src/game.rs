//! Game state: board, selection, swap validation, cascade resolution, score and moves.
//!
//! Resolution is a small state machine. Each step that needs the renderer opens a batch
//! on the [`AnimationGate`] and `advance` refuses to continue until that batch has
//! settled:
//!
//! ```text
//! Idle --swap--> Swapping --match--> Clearing --> Refilling --match--> Clearing ...
//!                   |                                 |
//!                   +--no match: revert--> Idle        +--quiet--> Idle
//! ```

use crate::config::GameConfig;
use crate::fairness::random_board;
use crate::gate::{AnimationGate, Motion, Ticket};
use crate::grid::{Coord, Grid, Tile, TileColor};
use crate::matcher::{MatchSet, find_matches};
use crate::rng::TileRng;

/// Points per cleared tile.
pub const POINTS_PER_TILE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for player input.
    Idle,
    /// Swap motion in flight; the grid is exchanged once it settles.
    Swapping {
        a: Coord,
        b: Coord,
        /// False for the revert of an unproductive swap.
        player_move: bool,
    },
    /// Fade motions in flight; the matched slots are emptied once they settle.
    Clearing { matches: MatchSet },
    /// Drop and spawn motions in flight; the board is checked again once they settle.
    Refilling,
}

/// Why a swap request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Resolving,
    NoMovesLeft,
    OutOfBounds,
    SameTile,
    NotAdjacent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Started,
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(Coord),
    Swap(SwapOutcome),
}

/// Bookkeeping changes for the score/moves display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    MovesChanged(u32),
    GameOver { final_score: u32 },
}

#[derive(Debug)]
pub struct GameState {
    grid: Grid,
    palette: &'static [TileColor],
    rng: TileRng,
    gate: AnimationGate,
    phase: Phase,
    score: u32,
    moves_left: u32,
    selected: Option<Coord>,
    events: Vec<GameEvent>,
    /// Clears performed by the resolution in progress (1 = no cascade yet).
    chain: u32,
}

impl GameState {
    /// Fresh session with a random, match-free board.
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = config
            .seed
            .map_or_else(TileRng::from_entropy, TileRng::seeded);
        let palette = TileColor::palette(config.colors);
        let grid = random_board(config.grid_size, palette, &mut rng);
        Self::with_grid(config, grid, rng)
    }

    /// Session on a prepared board. Refills draw from `rng`.
    pub fn with_grid(config: &GameConfig, grid: Grid, rng: TileRng) -> Self {
        Self {
            grid,
            palette: TileColor::palette(config.colors),
            rng,
            gate: AnimationGate::new(),
            phase: Phase::Idle,
            score: 0,
            moves_left: config.starting_moves,
            selected: None,
            events: Vec::new(),
            chain: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn palette(&self) -> &'static [TileColor] {
        self.palette
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn gate(&self) -> &AnimationGate {
        &self.gate
    }

    /// A swap or cascade is in flight; player input is ignored.
    pub fn is_resolving(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_game_over(&self) -> bool {
        self.moves_left == 0 && !self.is_resolving()
    }

    /// The two tiles to draw exchanged while a swap motion plays.
    pub fn pending_swap(&self) -> Option<(Coord, Coord)> {
        match self.phase {
            Phase::Swapping { a, b, .. } if !self.gate.is_settled() => Some((a, b)),
            _ => None,
        }
    }

    /// Renderer reports one motion finished.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        self.gate.complete(ticket)
    }

    /// Renderer reports the whole current batch finished.
    #[cfg(test)]
    pub fn complete_all(&mut self) {
        self.gate.complete_all();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pointer/keyboard selection. The first click selects a tile, a click on an
    /// adjacent tile swaps with it, any other click moves the selection.
    pub fn click(&mut self, c: Coord) -> ClickOutcome {
        if self.is_resolving() || self.moves_left == 0 || self.grid.get(c).is_none() {
            return ClickOutcome::Ignored;
        }
        match self.selected {
            Some(sel) if sel == c => ClickOutcome::Ignored,
            Some(sel) if sel.is_adjacent(c) => {
                self.selected = None;
                ClickOutcome::Swap(self.attempt_swap(sel, c))
            }
            _ => {
                self.selected = Some(c);
                ClickOutcome::Selected(c)
            }
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Start swapping two adjacent tiles. Rejected requests change nothing.
    pub fn attempt_swap(&mut self, a: Coord, b: Coord) -> SwapOutcome {
        let rejection = if self.is_resolving() {
            Some(Rejection::Resolving)
        } else if self.moves_left == 0 {
            Some(Rejection::NoMovesLeft)
        } else if self.grid.get(a).is_none() || self.grid.get(b).is_none() {
            Some(Rejection::OutOfBounds)
        } else if a == b {
            Some(Rejection::SameTile)
        } else if !a.is_adjacent(b) {
            Some(Rejection::NotAdjacent)
        } else {
            None
        };
        if let Some(why) = rejection {
            log::debug!("swap ({},{})<->({},{}) rejected: {why:?}", a.x, a.y, b.x, b.y);
            return SwapOutcome::Rejected(why);
        }
        log::debug!("swap ({},{})<->({},{})", a.x, a.y, b.x, b.y);
        self.phase = Phase::Swapping {
            a,
            b,
            player_move: true,
        };
        self.gate.open(vec![Motion::Swap { a, b }]);
        SwapOutcome::Started
    }

    /// Take the next resolution step if the current animation batch has settled.
    /// Returns false when idle or still waiting.
    pub fn advance(&mut self) -> bool {
        if !self.is_resolving() || !self.gate.is_settled() {
            return false;
        }
        self.gate.close();
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => return false,
            Phase::Swapping { a, b, player_move } => self.finish_swap(a, b, player_move),
            Phase::Clearing { matches } => self.clear_and_refill(&matches),
            Phase::Refilling => self.detect_cascade(),
        }
        true
    }

    /// Run the current resolution to the end without waiting for any renderer.
    pub fn resolve_now(&mut self) {
        while self.is_resolving() {
            self.gate.complete_all();
            self.advance();
        }
    }

    fn finish_swap(&mut self, a: Coord, b: Coord, player_move: bool) {
        self.grid.swap(a, b);
        let matches = find_matches(&self.grid);
        if !matches.is_empty() {
            if player_move {
                self.moves_left = self.moves_left.saturating_sub(1);
                self.events.push(GameEvent::MovesChanged(self.moves_left));
            }
            self.chain = 0;
            self.begin_clear(matches);
        } else if player_move {
            log::debug!("no match, reverting");
            self.phase = Phase::Swapping {
                a,
                b,
                player_move: false,
            };
            self.gate.open(vec![Motion::Swap { a, b }]);
        } else {
            self.finish_resolution();
        }
    }

    fn begin_clear(&mut self, matches: MatchSet) {
        self.chain += 1;
        log::debug!("clear #{}: {} tiles", self.chain, matches.len());
        let fades = matches
            .tiles()
            .iter()
            .map(|t| Motion::Fade {
                at: t.pos,
                color: t.color,
            })
            .collect();
        self.gate.open(fades);
        self.phase = Phase::Clearing { matches };
    }

    fn clear_and_refill(&mut self, matches: &MatchSet) {
        for c in matches.coords() {
            self.grid.take(c);
        }
        self.score += matches.len() as u32 * POINTS_PER_TILE;
        self.events.push(GameEvent::ScoreChanged(self.score));

        let motions = self.collapse_and_refill();
        debug_assert!(!self.grid.has_gaps() && self.grid.is_full());
        self.gate.open(motions);
        self.phase = Phase::Refilling;
    }

    /// Gravity on every column, then new tiles into the empty top slots.
    fn collapse_and_refill(&mut self) -> Vec<Motion> {
        let mut motions = Vec::new();
        for x in 0..self.grid.size() {
            for (from, to) in self.grid.compact_column(x) {
                if let Some(color) = self.grid.color_at(to) {
                    motions.push(Motion::Drop { from, to, color });
                }
            }
            for y in 0..self.grid.empty_in_column(x) {
                let at = Coord::new(x, y);
                let color = self.rng.pick(self.palette);
                self.grid.set(at, Some(Tile::new(color, at)));
                motions.push(Motion::Spawn { at, color });
            }
        }
        motions
    }

    fn detect_cascade(&mut self) {
        let matches = find_matches(&self.grid);
        if matches.is_empty() {
            self.finish_resolution();
        } else {
            self.begin_clear(matches);
        }
    }

    fn finish_resolution(&mut self) {
        self.phase = Phase::Idle;
        if self.chain > 1 {
            log::debug!("cascade of {} clears, score {}", self.chain, self.score);
        }
        self.chain = 0;
        if self.moves_left == 0 {
            log::info!("out of moves, final score {}", self.score);
            self.events.push(GameEvent::GameOver {
                final_score: self.score,
            });
        }
    }
}
