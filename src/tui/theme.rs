// Theme system for the TUI
//
// Small set of switchable color themes. "radar" is the green-on-black
// console look matching the original widget's aesthetic.

use ratatui::style::Color;

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    Radar,
}

impl ThemeKind {
    pub fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Dark, ThemeKind::Light, ThemeKind::Radar]
    }

    /// Parse a configured theme name, falling back to the default
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => ThemeKind::Light,
            "radar" => ThemeKind::Radar,
            _ => ThemeKind::Dark,
        }
    }

    pub fn next(self) -> Self {
        let themes = Self::all();
        let current = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(current + 1) % themes.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
            ThemeKind::Radar => "Radar",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
            ThemeKind::Radar => Theme::radar(),
        }
    }
}

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub border: Color,
    pub title: Color,
    pub highlight: Color,

    // Map layers
    pub map_land: Color,
    pub marker: Color,
    pub accuracy: Color,
    pub popup: Color,
    pub spark_hot: Color,
    pub spark_cool: Color,

    // Status feed tags
    pub status_ok: Color,
    pub status_warn: Color,
    pub status_err: Color,
    pub status_info: Color,

    // Log levels
    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            fg: Color::Gray,
            border: Color::DarkGray,
            title: Color::Cyan,
            highlight: Color::Yellow,
            map_land: Color::DarkGray,
            marker: Color::Red,
            accuracy: Color::Blue,
            popup: Color::Yellow,
            spark_hot: Color::Yellow,
            spark_cool: Color::Red,
            status_ok: Color::Green,
            status_warn: Color::Yellow,
            status_err: Color::Red,
            status_info: Color::Cyan,
            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Green,
            log_debug: Color::DarkGray,
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            border: Color::Gray,
            title: Color::Blue,
            highlight: Color::Magenta,
            map_land: Color::Gray,
            marker: Color::Red,
            accuracy: Color::Blue,
            popup: Color::Magenta,
            spark_hot: Color::LightRed,
            spark_cool: Color::Magenta,
            status_ok: Color::Green,
            status_warn: Color::LightYellow,
            status_err: Color::Red,
            status_info: Color::Blue,
            log_error: Color::Red,
            log_warn: Color::LightYellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
        }
    }

    pub fn radar() -> Self {
        Self {
            fg: Color::Green,
            border: Color::Green,
            title: Color::LightGreen,
            highlight: Color::LightGreen,
            map_land: Color::Green,
            marker: Color::LightGreen,
            accuracy: Color::Green,
            popup: Color::LightGreen,
            spark_hot: Color::LightGreen,
            spark_cool: Color::Green,
            status_ok: Color::LightGreen,
            status_warn: Color::Yellow,
            status_err: Color::Red,
            status_info: Color::Green,
            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Green,
            log_debug: Color::DarkGray,
        }
    }
}
