//! Custom TUI widgets

use super::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Large WPM readout
pub struct WpmReadout {
    wpm: u32,
    active: bool,
    colors: ThemeColors,
}

impl WpmReadout {
    pub fn new(wpm: u32, active: bool, colors: ThemeColors) -> Self {
        Self { wpm, active, colors }
    }
}

impl Widget for WpmReadout {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Speed ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.muted));
        let inner = block.inner(area);
        block.render(area, buf);

        let value_style = Style::default()
            .fg(self.colors.speed(self.wpm, self.active))
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("{}", self.wpm), value_style),
                Span::styled(" WPM", Style::default().fg(self.colors.muted)),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

/// Label/value statistics panel
pub struct StatsPanel<'a> {
    rows: &'a [(&'static str, String)],
    colors: ThemeColors,
}

impl<'a> StatsPanel<'a> {
    pub fn new(rows: &'a [(&'static str, String)], colors: ThemeColors) -> Self {
        Self { rows, colors }
    }
}

impl<'a> Widget for StatsPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Session ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.muted));
        let inner = block.inner(area);
        block.render(area, buf);

        for (i, (label, value)) in self.rows.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<12}", label),
                    Style::default().fg(self.colors.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(value.as_str(), Style::default().fg(self.colors.value)),
            ]);
            buf.set_line(inner.x + 1, inner.y + i as u16, &line, inner.width.saturating_sub(1));
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    elapsed: &'a str,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a str, elapsed: &'a str, colors: ThemeColors) -> Self {
        Self {
            state,
            elapsed,
            message: None,
            colors,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.muted).fg(self.colors.bg);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} ", self.state);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = bg_style.fg(self.colors.notice);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(" {} | space: start/stop  r: reset  e: export  q: quit ", self.elapsed);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    fn render_to_string(widget: impl Widget, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn readout_shows_rounded_wpm() {
        let colors = ThemeColors::from_theme(Theme::Dark);
        let text = render_to_string(WpmReadout::new(87, true, colors), 30, 5);
        assert!(text.contains("87 WPM"));
    }

    #[test]
    fn stats_panel_lists_rows() {
        let colors = ThemeColors::from_theme(Theme::Light);
        let rows = vec![("Peak WPM", "112".to_string()), ("Keystrokes", "640".to_string())];
        let text = render_to_string(StatsPanel::new(&rows, colors), 40, 5);
        assert!(text.contains("Peak WPM"));
        assert!(text.contains("640"));
    }

    #[test]
    fn status_bar_shows_state_and_message() {
        let colors = ThemeColors::dark();
        let bar = StatusBar::new("RUNNING", "01:05", colors).message(Some("Exported"));
        let text = render_to_string(bar, 120, 1);
        assert!(text.contains("RUNNING"));
        assert!(text.contains("Exported"));
        assert!(text.contains("01:05"));
    }
}
