use colored::Color;
use comfy_table::Color as TableColor;
use once_cell::sync::Lazy;

use bugwatch_search::{SuggestionType, TokenKind};

/// CLI color theme configuration
pub struct ColorTheme {
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
    pub highlight: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub key: Color,
    pub value: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            highlight: Color::Cyan,
            muted: Color::BrightBlack,
            primary: Color::BrightBlue,
            secondary: Color::Magenta,
            key: Color::BrightCyan,
            value: Color::White,
        }
    }
}

/// Global theme instance
pub static THEME: Lazy<ColorTheme> = Lazy::new(ColorTheme::default);

/// Icons for different message types
pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub arrow: &'static str,
    pub bullet: &'static str,
    pub caret: &'static str,
}

pub const ICONS: Icons = Icons {
    success: "✓",
    error: "✗",
    warning: "⚠",
    info: "ℹ",
    arrow: "→",
    bullet: "•",
    caret: "^",
};

/// Table cell color for a token, matching the search bar highlighting.
pub fn token_color(kind: TokenKind) -> TableColor {
    match kind {
        TokenKind::Field => TableColor::Cyan,
        TokenKind::Sort => TableColor::Magenta,
        TokenKind::Operator => TableColor::Yellow,
        TokenKind::Text => TableColor::White,
    }
}

pub fn suggestion_color(kind: SuggestionType) -> TableColor {
    match kind {
        SuggestionType::Field => TableColor::Cyan,
        SuggestionType::Value => TableColor::Green,
        SuggestionType::Operator => TableColor::Yellow,
        SuggestionType::History => TableColor::DarkGrey,
        SuggestionType::Saved => TableColor::Magenta,
    }
}
