//! Layout and drawing: board, sidebar, game over; tile effects for the animation gate.

use crate::app::Screen;
use crate::game::{GameState, Phase};
use crate::gate::{Motion, Ticket};
use crate::grid::Coord;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal cells per tile, including a one-cell gap to the right / below.
const TILE_W: u16 = 5;
const TILE_H: u16 = 2;

const SIDEBAR_WIDTH: u16 = 24;

/// Effect durations in ms.
const SWAP_MS: u32 = 180;
const FADE_MS: u32 = 140;
const DROP_MS: u32 = 140;
const SPAWN_MS: u32 = 260;

/// Board size in terminal cells, border included.
fn board_outer_size(n: usize) -> (u16, u16) {
    let n = n as u16;
    (n * TILE_W + 1 + 2, n * TILE_H + 1 + 2)
}

/// Board (with border) and sidebar, centred as one block in `area`.
fn game_layout(area: Rect, n: usize) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(n);
    let total_w = bw + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(bh) / 2;
    let board = Rect {
        x,
        y,
        width: bw.min(area.width),
        height: bh.min(area.height),
    };
    let sidebar = Rect {
        x: x + board.width,
        y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(board.width)),
        height: board.height,
    };
    (board, sidebar)
}

/// Inner board rect (inside the border) for an `n`×`n` grid drawn in `area`.
pub fn board_rect(area: Rect, n: usize) -> Rect {
    let (outer, _) = game_layout(area, n);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Coloured part of one tile.
pub fn tile_rect(board: Rect, c: Coord) -> Rect {
    Rect {
        x: board.x + 1 + c.x as u16 * TILE_W,
        y: board.y + 1 + c.y as u16 * TILE_H,
        width: TILE_W - 1,
        height: TILE_H - 1,
    }
}

/// Tile under terminal cell (`col`, `row`); gaps and the margin hit nothing.
pub fn tile_at(board: Rect, n: usize, col: u16, row: u16) -> Option<Coord> {
    let dx = col.checked_sub(board.x + 1)?;
    let dy = row.checked_sub(board.y + 1)?;
    if dx % TILE_W == TILE_W - 1 || dy % TILE_H == TILE_H - 1 {
        return None;
    }
    let (x, y) = ((dx / TILE_W) as usize, (dy / TILE_H) as usize);
    (x < n && y < n).then(|| Coord::new(x, y))
}

/// Live tachyonfx effects for the gate's current batch, one per ticket.
#[derive(Default)]
pub struct MotionEffects {
    batch: Option<u64>,
    effects: Vec<(Ticket, Rect, Effect)>,
    last_process: Option<Instant>,
    /// Frame area of the last render; effects outside it count as finished.
    visible: Rect,
}

impl MotionEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[cfg(test)]
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Tickets whose effect has run to the end or has nowhere to play.
    pub fn finished(&self) -> Vec<Ticket> {
        self.effects
            .iter()
            .filter(|(_, area, e)| e.done() || area.intersection(self.visible).is_empty())
            .map(|(t, _, _)| *t)
            .collect()
    }

    /// Build effects when the gate has opened a batch we haven't seen.
    fn sync(&mut self, state: &GameState, theme: &Theme, board: Rect) {
        let Some(batch) = state.gate().batch() else {
            self.effects.clear();
            self.batch = None;
            return;
        };
        if self.batch == Some(batch.id()) {
            return;
        }
        self.batch = Some(batch.id());
        self.effects = batch
            .tickets()
            .map(|(ticket, motion)| {
                let (area, effect) = effect_for(motion, board, theme);
                (ticket, area, effect)
            })
            .collect();
    }
}

fn effect_for(motion: Motion, board: Rect, theme: &Theme) -> (Rect, Effect) {
    let bg = theme.bg;
    match motion {
        Motion::Swap { a, b } => (
            tile_rect(board, a).union(tile_rect(board, b)),
            fx::fade_from(bg, bg, (SWAP_MS, Interpolation::QuadOut)),
        ),
        Motion::Fade { at, .. } => (
            tile_rect(board, at),
            fx::fade_to(bg, bg, (FADE_MS, Interpolation::Linear)),
        ),
        Motion::Drop { to, .. } => (
            tile_rect(board, to),
            fx::fade_from(theme.div_line, bg, (DROP_MS, Interpolation::Linear)),
        ),
        Motion::Spawn { at, .. } => (
            tile_rect(board, at),
            fx::fade_from(bg, bg, (SPAWN_MS, Interpolation::QuadOut)),
        ),
    }
}

/// Process every live motion effect by the time since the last frame.
fn render_motion_effects(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    board: Rect,
    effects: &mut MotionEffects,
    now: Instant,
) {
    effects.sync(state, theme, board);
    let delta = effects
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    effects.last_process = Some(now);

    let visible = frame.area();
    effects.visible = visible;
    for (_, area, effect) in &mut effects.effects {
        let area = area.intersection(visible);
        if !effect.done() && !area.is_empty() {
            frame.render_effect(effect, area, tfx_delta);
        }
    }
}

/// Draw the current screen. With `animate`, motion effects for the open batch are
/// created and advanced; without it they are left alone and the caller settles batches.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    cursor: Coord,
    effects: &mut MotionEffects,
    now: Instant,
    animate: bool,
) {
    let area = frame.area();
    let n = state.grid().size();
    let (board_outer, sidebar) = game_layout(area, n);
    draw_board(frame, state, theme, board_outer, cursor, screen == Screen::Playing);
    draw_sidebar(frame, state, theme, sidebar);
    if animate {
        render_motion_effects(frame, state, theme, board_rect(area, n), effects, now);
    }
    if screen == Screen::GameOver {
        draw_game_over(frame, state, theme, board_outer);
    }
}

fn draw_board(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    outer: Rect,
    cursor: Coord,
    show_cursor: bool,
) {
    let title = if state.is_resolving() {
        " Color Clash  ··· "
    } else {
        " Color Clash "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)));
    let inner = block.inner(outer);
    block.render(outer, frame.buffer_mut());
    frame
        .buffer_mut()
        .set_style(inner, Style::default().bg(theme.bg));

    let swap = state.pending_swap();
    let selected = state.selected();
    let buf = frame.buffer_mut();
    for c in state.grid().coords() {
        // During a swap motion the two tiles are shown already exchanged.
        let shown = match swap {
            Some((a, b)) if c == a => b,
            Some((a, b)) if c == b => a,
            _ => c,
        };
        let Some(color) = state.grid().color_at(shown) else {
            continue;
        };
        let rect = tile_rect(inner, c).intersection(inner);
        if rect.is_empty() {
            continue;
        }
        let tile_bg = theme.tile_color(color);
        buf.set_style(rect, Style::default().bg(tile_bg));

        let is_cursor = show_cursor && c == cursor;
        let is_selected = selected == Some(c);
        let label = match (is_cursor, is_selected) {
            (true, true) => "[◆◆]",
            (true, false) => "[  ]",
            (false, true) => " ◆◆ ",
            (false, false) => continue,
        };
        put_str(
            buf,
            rect,
            label,
            Style::default()
                .fg(Color::White)
                .bg(tile_bg)
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// `set_string` clipped to `rect` (and the buffer).
fn put_str(buf: &mut Buffer, rect: Rect, s: &str, style: Style) {
    let rect = rect.intersection(buf.area);
    if rect.is_empty() {
        return;
    }
    buf.set_stringn(rect.x, rect.y, s, rect.width as usize, style);
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    if area.is_empty() {
        return;
    }
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let hint_style = Style::default().fg(theme.inactive_fg);

    let status = if state.is_game_over() {
        Span::styled("Out of moves", Style::default().fg(Color::Red))
    } else if matches!(state.phase(), Phase::Idle) {
        Span::styled("Your move", fg_style)
    } else {
        Span::styled("Resolving…", hint_style)
    };

    let mut swatches = vec![Span::styled("Colours: ", title_style)];
    for &color in state.palette() {
        let c = theme.tile_color(color);
        swatches.push(Span::styled("██", Style::default().fg(c)));
        swatches.push(Span::from(" "));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(state.score().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Moves: ", title_style),
            Span::styled(state.moves_left().to_string(), fg_style),
        ]),
        Line::from(""),
        Line::from(status),
        Line::from(""),
        Line::from(swatches),
        Line::from(""),
        Line::from(Span::styled("←↑↓→ / hjkl  move", hint_style)),
        Line::from(Span::styled("Space/Enter  select", hint_style)),
        Line::from(Span::styled("Mouse        click", hint_style)),
        Line::from(Span::styled("Esc deselect  R new", hint_style)),
        Line::from(Span::styled("Q quit", hint_style)),
    ];
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(area, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, board: Rect) {
    let popup_w = 28u16;
    let popup_h = 7u16;
    let popup = Rect {
        x: board.x + board.width.saturating_sub(popup_w) / 2,
        y: board.y + board.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(board.width),
        height: popup_h.min(board.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over! ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", state.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            " R — Restart    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}
