//! Light and dark colour palettes for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Category, Priority};

/// Colours used across the UI for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub bar_text: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub overdue: Color,
    pub high: Color,
    pub medium: Color,
    pub low: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            text: Color::Rgb(33, 33, 33),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(25, 118, 210),
            bar_text: Color::White,
            selection_bg: Color::Rgb(187, 222, 251),
            selection_fg: Color::Rgb(13, 71, 161),
            overdue: Color::Rgb(211, 47, 47),
            high: Color::Rgb(211, 47, 47),
            medium: Color::Rgb(237, 108, 2),
            low: Color::Rgb(46, 125, 50),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 18),
            text: Color::Rgb(230, 230, 230),
            dim: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(144, 202, 249),
            bar_text: Color::Rgb(18, 18, 18),
            selection_bg: Color::Rgb(48, 63, 80),
            selection_fg: Color::White,
            overdue: Color::Rgb(244, 67, 54),
            high: Color::Rgb(244, 67, 54),
            medium: Color::Rgb(255, 167, 38),
            low: Color::Rgb(102, 187, 106),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn priority(&self, p: Priority) -> Color {
        match p {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Single-character marker shown before a category name.
pub fn category_icon(c: Category) -> &'static str {
    match c {
        Category::Personal => "☺",
        Category::Work => "⚒",
        Category::Shopping => "$",
        Category::Health => "♥",
        Category::Other => "•",
    }
}
