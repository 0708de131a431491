use ratatui::layout::{Constraint, Direction, Layout, Rect};

mod canvas;
mod deck;
mod fps;
mod indicator;
mod popup;
mod sections;
mod status_bar;

pub use canvas::PixelCanvas;
pub use deck::DeckWidget;
pub use fps::FpsWidget;
pub use indicator::IndicatorWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;

/// Width of the indicator column
const INDICATOR_WIDTH: u16 = 4;

/// Screen regions, shared by drawing and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub deck: Rect,
    pub indicator: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        // Main layout: content + status bar
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(INDICATOR_WIDTH)])
            .split(rows[0]);

        Self {
            deck: columns[0],
            indicator: columns[1],
            status: rows[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_screen() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.deck, Rect::new(0, 0, 76, 23));
        assert_eq!(layout.indicator, Rect::new(76, 0, 4, 23));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
    }
}
