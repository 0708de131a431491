use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Sparkline, Widget},
};

use snapdeck_core::metrics::FpsMeter;

use crate::theme::Theme;

/// Target frame rate the sparkline is scaled to
const TARGET_FPS: u64 = 60;

/// Frame-rate timeline with stutter count
pub struct FpsWidget;

impl FpsWidget {
    pub fn render(area: Rect, buf: &mut Buffer, fps: &FpsMeter, theme: &Theme) {
        let title = Line::from(vec![
            Span::raw(" FPS: "),
            Span::styled(
                format!("{:.0}", fps.current_fps()),
                Style::default()
                    .fg(theme.health(fps.last_stutter()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" · Stutters(>33ms): {} ", fps.stutters()),
                Style::default().fg(theme.grey1),
            ),
        ]);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0));
        let inner = block.inner(area);
        block.render(area, buf);

        let data = Self::bars(fps, inner.width as usize);
        Sparkline::default()
            .data(&data)
            .max(TARGET_FPS)
            .style(Style::default().fg(theme.health(fps.last_stutter())))
            .render(inner, buf);
    }

    /// Latest `width` samples, clamped to the target rate
    fn bars(fps: &FpsMeter, width: usize) -> Vec<u64> {
        let skip = fps.len().saturating_sub(width);
        fps.samples()
            .skip(skip)
            .map(|s| (s.fps.round() as u64).min(TARGET_FPS))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_bars_keep_latest_samples() {
        let t0 = Instant::now();
        let mut fps = FpsMeter::default();
        for i in 0..10u64 {
            fps.record(t0 + Duration::from_millis(i * 10));
        }
        let bars = FpsWidget::bars(&fps, 4);
        assert_eq!(bars.len(), 4);
        // 100 fps is clamped to the target
        assert!(bars.iter().all(|&b| b == TARGET_FPS));
    }
}
