use ratatui::style::Color;

use crate::model::{TagColor, ThemeMode, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    /// Global-task accent
    pub global: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            mode: ThemeMode::Dark,
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            global: Color::Rgb(0x44, 0xDD, 0xFF),
        }
    }

    pub fn light() -> Self {
        Theme {
            mode: ThemeMode::Light,
            background: Color::Rgb(0xFA, 0xF8, 0xFF),
            text: Color::Rgb(0x3A, 0x33, 0x5C),
            text_bright: Color::Rgb(0x0C, 0x00, 0x1B),
            highlight: Color::Rgb(0xC2, 0x18, 0x5B),
            dim: Color::Rgb(0x8A, 0x85, 0xA8),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            green: Color::Rgb(0x2E, 0x7D, 0x32),
            selection_bg: Color::Rgb(0xEB, 0xE3, 0xF7),
            selection_border: Color::Rgb(0xC2, 0x18, 0x5B),
            global: Color::Rgb(0x00, 0x83, 0x8F),
        }
    }

    /// Base theme for `mode`
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Theme::light(),
            ThemeMode::Dark => Theme::dark(),
        }
    }

    /// Create a theme from UI config: the configured mode plus `[ui.colors]` overrides
    pub fn from_config(ui: &UiConfig) -> Self {
        Theme::with_overrides(ui, ui.theme)
    }

    /// Like [`Theme::from_config`] but for an explicit mode (used when toggling)
    pub fn with_overrides(ui: &UiConfig, mode: ThemeMode) -> Self {
        let mut theme = Theme::for_mode(mode);
        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "green" => theme.green = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    "global" => theme.global = color,
                    _ => {}
                }
            }
        }
        theme
    }

    /// Terminal color for a tag, tuned per mode so it reads on the background
    pub fn tag_color(&self, color: TagColor) -> Color {
        let (dark, light) = match color {
            TagColor::Red => ((0xFF, 0x55, 0x55), (0xC6, 0x28, 0x28)),
            TagColor::Orange => ((0xFF, 0x99, 0x33), (0xE6, 0x51, 0x00)),
            TagColor::Yellow => ((0xFF, 0xD7, 0x00), (0x9E, 0x7C, 0x00)),
            TagColor::Green => ((0x44, 0xFF, 0x88), (0x2E, 0x7D, 0x32)),
            TagColor::Teal => ((0x40, 0xE0, 0xD0), (0x00, 0x79, 0x6B)),
            TagColor::Blue => ((0x44, 0x88, 0xFF), (0x15, 0x65, 0xC0)),
            TagColor::Cyan => ((0x44, 0xDD, 0xFF), (0x00, 0x83, 0x8F)),
            TagColor::Purple => ((0xCC, 0x66, 0xFF), (0x6A, 0x1B, 0x9A)),
            TagColor::Pink => ((0xFF, 0x79, 0xC6), (0xAD, 0x14, 0x57)),
            TagColor::Gray => ((0xA0, 0xA0, 0xB0), (0x61, 0x61, 0x61)),
        };
        let (r, g, b) = match self.mode {
            ThemeMode::Dark => dark,
            ThemeMode::Light => light,
        };
        Color::Rgb(r, g, b)
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
