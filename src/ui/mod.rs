//! Terminal readout for the live WPM figure

mod app;
pub mod theme;
mod widgets;

pub use app::{App, AppState};
pub use theme::ThemeColors;
pub use widgets::{StatsPanel, StatusBar, WpmReadout};
