use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    Frame,
};

use crate::app::App;

/// Vertical column of section dots; one row gap between dots
pub struct IndicatorWidget;

impl IndicatorWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let count = app.deck.section_count();
        let buf = frame.buffer_mut();
        for dot in app.deck.indicator() {
            let Some((x, y)) = Self::dot_position(area, count, dot.index) else {
                continue;
            };
            let (symbol, style) = if dot.active {
                (
                    "●",
                    Style::default()
                        .fg(app.theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("○", Style::default().fg(app.theme.grey1))
            };
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }

    /// Screen cell of dot `index`, `None` when it does not fit
    pub fn dot_position(area: Rect, count: usize, index: usize) -> Option<(u16, u16)> {
        if area.is_empty() || index >= count {
            return None;
        }
        let span = (count * 2 - 1) as u16;
        let top = area.y + area.height.saturating_sub(span) / 2;
        let y = top + index as u16 * 2;
        (y < area.bottom()).then_some((area.x + area.width / 2, y))
    }

    /// Dot under a click anywhere on its row of the column
    pub fn hit_test(area: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
        if column < area.x || column >= area.right() {
            return None;
        }
        (0..count).find(|&index| {
            Self::dot_position(area, count, index).is_some_and(|(_, y)| y == row)
        })
    }
}
