//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Scheme;
use crate::grid::TileColor;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// One Dark palette and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours indexed by `TileColor::index`: red, blue, green, yellow, purple, cyan.
    pub tiles: [Color; 6],
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, moves).
    pub main_fg: Color,
    /// Highlight / titles / cursor.
    pub title: Color,
    /// Secondary text (key hints).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_TILES: [Color; 6] = [
    rgb(0xE0_6C_75), // cpu_end / red
    rgb(0x61_AF_EF), // cpu_box / blue
    rgb(0x98_C3_79), // mem_box / green
    rgb(0xE5_C0_7B), // title / yellow
    rgb(0xC6_78_DD), // net_box / purple
    rgb(0x56_B6_C2), // hi_fg / cyan
];

impl Theme {
    /// Hardcoded One Dark defaults (same hex values as onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            tiles: ONEDARK_TILES,
            bg: rgb(0x31_35_3F),          // meter_bg
            div_line: rgb(0x3F_44_4F),    // div_line
            main_fg: rgb(0xAB_B2_BF),     // main_fg
            title: rgb(0xE5_C0_7B),       // title
            inactive_fg: rgb(0x5C_63_70), // inactive_fg
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file is missing.
    /// `scheme` selects the tile colour variant.
    pub fn load(path: Option<&Path>, scheme: Scheme) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_scheme(scheme)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_scheme(scheme);
        Ok(theme)
    }

    fn default_for_scheme(scheme: Scheme) -> Self {
        let mut t = Self::onedark_default();
        t.apply_scheme(scheme);
        t
    }

    /// Override tile colours for high-contrast or colorblind play.
    pub fn apply_scheme(&mut self, scheme: Scheme) {
        match scheme {
            Scheme::Normal => {}
            Scheme::HighContrast => {
                self.tiles = [
                    rgb(0xFF_00_00), // red
                    rgb(0x00_88_FF), // blue
                    rgb(0x00_FF_00), // green
                    rgb(0xFF_FF_00), // yellow
                    rgb(0xFF_00_FF), // magenta
                    rgb(0x00_FF_FF), // cyan
                ];
            }
            Scheme::Colorblind => {
                // Paul Tol's bright scheme: no red/green pair carries meaning alone
                self.tiles = [
                    rgb(0xCC_33_11), // red
                    rgb(0x00_77_BB), // blue
                    rgb(0x00_99_88), // teal
                    rgb(0xEE_77_33), // orange
                    rgb(0xEE_33_77), // magenta
                    rgb(0xBB_BB_00), // olive
                ];
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .and_then(|v| parse_hex(v.trim_matches('"').trim_matches('\'').trim()).ok())
        };
        let d = Self::onedark_default();
        Self {
            tiles: [
                get("cpu_end").or_else(|| get("temp_end")).unwrap_or(d.tiles[0]),
                get("cpu_box").unwrap_or(d.tiles[1]),
                get("mem_box").or_else(|| get("cpu_start")).unwrap_or(d.tiles[2]),
                get("title").or_else(|| get("cpu_mid")).unwrap_or(d.tiles[3]),
                get("net_box").unwrap_or(d.tiles[4]),
                get("hi_fg").or_else(|| get("proc_misc")).unwrap_or(d.tiles[5]),
            ],
            bg: get("meter_bg").unwrap_or(d.bg),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
        }
    }

    #[inline]
    pub fn tile_color(&self, color: TileColor) -> Color {
        self.tiles[color.index() % self.tiles.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |part: &str| {
        u8::from_str_radix(part, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}
