//! Clashtui: match-three colour clash puzzle in the terminal.

mod app;
mod config;
mod fairness;
mod game;
mod gate;
mod grid;
mod input;
mod logging;
mod matcher;
mod rng;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use config::{DEFAULT_COLORS, DEFAULT_GRID_SIZE, DEFAULT_MOVES, GameConfig};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        logging::init(path)?;
    }
    let config = GameConfig {
        grid_size: args.size,
        colors: args.colors,
        starting_moves: args.moves,
        seed: args.seed,
    };
    let theme = theme::Theme::load(args.theme.as_deref(), args.scheme).unwrap_or_default();
    log::info!(
        "starting: {0}x{0} board, {1} colours, {2} moves, seed {3:?}",
        config.grid_size,
        config.colors,
        config.starting_moves,
        config.seed
    );
    let mut app = App::new(config, theme, args.no_animation)?;
    app.run()?;
    Ok(())
}

/// Match-three colour clash puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "clashtui",
    version,
    about = "Match-three colour clash puzzle in the terminal. Swap neighbouring tiles to line up three or more of a colour.",
    long_about = "Clashtui is a terminal match-three puzzle.\n\n\
        Select a tile, then an orthogonal neighbour, to swap them. A swap that lines up three or \
        more tiles of one colour clears them for 10 points each; tiles above fall and new ones \
        drop in, which may set off more matches. A swap that matches nothing is undone and costs \
        nothing. The game ends when you run out of moves.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor   Enter / Space  Select / swap\n  \
        Mouse click    Select / swap Esc            Deselect\n  R              Restart       Q / Ctrl-C     Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Board width and height in tiles.
    #[arg(short, long, default_value_t = DEFAULT_GRID_SIZE, value_name = "N")]
    pub size: usize,

    /// Number of tile colours in play (2 to 6).
    #[arg(short, long, default_value_t = DEFAULT_COLORS, value_name = "N")]
    pub colors: usize,

    /// Moves at the start of a game.
    #[arg(short, long, default_value_t = DEFAULT_MOVES, value_name = "N")]
    pub moves: u32,

    /// Seed for the tile generator; the same seed deals the same boards.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Disable tile animations (swaps and clears resolve instantly).
    #[arg(long)]
    pub no_animation: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Tile colours: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub scheme: Scheme,

    /// Write a log to FILE (level from RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scheme {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_board() {
        let args = Args::try_parse_from(["clashtui"]).unwrap();
        assert_eq!(args.size, 8);
        assert_eq!(args.colors, 5);
        assert_eq!(args.moves, 30);
        assert_eq!(args.scheme, Scheme::Normal);
        assert!(!args.no_animation);
    }

    #[test]
    fn parses_flags_and_scheme_aliases() {
        let args = Args::try_parse_from([
            "clashtui", "-s", "6", "--colors", "4", "--seed", "42", "--scheme", "contrast",
            "--no-animation",
        ])
        .unwrap();
        assert_eq!(args.size, 6);
        assert_eq!(args.colors, 4);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.scheme, Scheme::HighContrast);
        assert!(args.no_animation);
        let args = Args::try_parse_from(["clashtui", "--scheme", "colourblind"]).unwrap();
        assert_eq!(args.scheme, Scheme::Colorblind);
    }
}
