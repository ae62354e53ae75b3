//! App: terminal init, main loop, animation gate pumping and input handling.

use crate::config::GameConfig;
use crate::game::{ClickOutcome, GameEvent, GameState};
use crate::grid::Coord;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, MotionEffects};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// Target frame time (~60 FPS).
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    no_animation: bool,
    state: GameState,
    screen: Screen,
    cursor: Coord,
    /// Effects for the gate's current batch (created lazily by the renderer).
    effects: MotionEffects,
    /// Terminal area of the last draw, for mouse hit-testing.
    last_area: Rect,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme, no_animation: bool) -> Result<Self> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Self {
            config,
            theme,
            no_animation,
            state,
            screen: Screen::Playing,
            cursor: Coord::new(0, 0),
            effects: MotionEffects::new(),
            last_area: Rect::default(),
        })
    }

    fn reset_game(&mut self) {
        log::info!("restart");
        self.state = GameState::new(&self.config);
        self.screen = Screen::Playing;
        self.cursor = Coord::new(0, 0);
        self.effects.clear();
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let animate = !self.no_animation;
            terminal.draw(|f| {
                self.last_area = f.area();
                ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.cursor,
                    &mut self.effects,
                    now,
                    animate,
                );
            })?;

            self.pump_gate();
            self.handle_events();

            let timeout = Duration::from_millis(FRAME_MS).saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let quit = match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.apply_action(key_to_action(key))
                        }
                        Event::Mouse(mouse) => {
                            self.apply_mouse(mouse);
                            false
                        }
                        _ => false,
                    };
                    if quit {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Report finished effects to the gate and step the resolution as far as it goes.
    fn pump_gate(&mut self) {
        if self.no_animation {
            self.state.resolve_now();
            return;
        }
        for ticket in self.effects.finished() {
            self.state.complete(ticket);
        }
        while self.state.advance() {}
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged(score) => log::info!("score {score}"),
                GameEvent::MovesChanged(moves) => log::info!("moves left {moves}"),
                GameEvent::GameOver { final_score } => {
                    log::info!("game over, final score {final_score}");
                    self.screen = Screen::GameOver;
                }
            }
        }
    }

    /// Returns true when the app should exit.
    fn apply_action(&mut self, action: Action) -> bool {
        match (self.screen, action) {
            (_, Action::Quit) => return true,
            (_, Action::Restart) => self.reset_game(),
            (Screen::GameOver, _) => {}
            (Screen::Playing, Action::Select) => self.select(self.cursor),
            (Screen::Playing, Action::Deselect) => self.state.deselect(),
            (Screen::Playing, dir) => self.move_cursor(dir),
        }
        false
    }

    fn move_cursor(&mut self, action: Action) {
        let last = self.state.grid().size().saturating_sub(1);
        let Coord { x, y } = self.cursor;
        self.cursor = match action {
            Action::Up => Coord::new(x, y.saturating_sub(1)),
            Action::Down => Coord::new(x, (y + 1).min(last)),
            Action::Left => Coord::new(x.saturating_sub(1), y),
            Action::Right => Coord::new((x + 1).min(last), y),
            _ => self.cursor,
        };
    }

    fn apply_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Playing
            || mouse.kind != MouseEventKind::Down(MouseButton::Left)
        {
            return;
        }
        let n = self.state.grid().size();
        let board = ui::board_rect(self.last_area, n);
        if let Some(c) = ui::tile_at(board, n, mouse.column, mouse.row) {
            self.cursor = c;
            self.select(c);
        }
    }

    fn select(&mut self, c: Coord) {
        match self.state.click(c) {
            ClickOutcome::Swap(outcome) => log::debug!("click ({},{}): {outcome:?}", c.x, c.y),
            ClickOutcome::Selected(_) | ClickOutcome::Ignored => {}
        }
    }
}
