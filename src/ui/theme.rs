//! Color palettes for the readout

use crate::config::Theme;
use ratatui::style::Color;

/// Colors used by the readout widgets
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub bg: Color,
    /// Labels and slow typing
    pub text: Color,
    /// Borders, hints, and the readout while paused
    pub muted: Color,
    /// Statistic values
    pub value: Color,
    /// 40-79 WPM
    pub steady: Color,
    /// 80-119 WPM
    pub brisk: Color,
    /// 120 WPM and up
    pub blazing: Color,
    /// Transient status messages
    pub notice: Color,
}

impl ThemeColors {
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(18, 20, 26),
            text: Color::Rgb(214, 216, 222),
            muted: Color::Rgb(96, 100, 116),
            value: Color::Rgb(110, 190, 230),
            steady: Color::Rgb(120, 205, 130),
            brisk: Color::Rgb(235, 190, 95),
            blazing: Color::Rgb(235, 105, 95),
            notice: Color::Rgb(235, 190, 95),
        }
    }

    /// Darker hues for bright terminal backgrounds
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(250, 250, 246),
            text: Color::Rgb(36, 38, 44),
            muted: Color::Rgb(140, 142, 150),
            value: Color::Rgb(20, 110, 160),
            steady: Color::Rgb(40, 140, 70),
            brisk: Color::Rgb(170, 110, 10),
            blazing: Color::Rgb(190, 45, 45),
            notice: Color::Rgb(150, 90, 0),
        }
    }

    /// Readout color for a displayed speed
    pub fn speed(&self, wpm: u32, active: bool) -> Color {
        if !active {
            return self.muted;
        }
        match wpm {
            0..=39 => self.text,
            40..=79 => self.steady,
            80..=119 => self.brisk,
            _ => self.blazing,
        }
    }
}
