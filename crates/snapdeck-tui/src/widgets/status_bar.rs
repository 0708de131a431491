use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let mode_str = match app.mode {
            Mode::Normal if app.deck.is_animating() => "MOVING",
            Mode::Normal => "NORMAL",
            Mode::Input => "INPUT",
            Mode::Help => "HELP",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {} | {}", mode_str, msg)
        } else {
            format!(
                " {} | {}/{} {} | {}",
                mode_str,
                app.deck.current_index() + 1,
                app.deck.section_count(),
                app.active_section().title(),
                app.location_hash(),
            )
        };
        let metrics = format!(
            " {:.0} fps | input {}ms ",
            app.fps.current_fps(),
            app.latency.last_ms()
        );

        let help_hint = " q:quit j/k:section ?:help ";
        let used = status_text.width() + metrics.width() + help_hint.width();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(
                metrics,
                Style::default()
                    .fg(theme.health(app.latency.is_degraded() || app.fps.last_stutter()))
                    .bg(theme.bg2),
            ),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
