use ratatui::{buffer::Buffer, layout::Rect, Frame};

use crate::app::App;

use super::sections;

/// The sliding container
///
/// Each section is drawn at full height into its own buffer, then copied onto
/// the screen shifted by the deck offset, so a transition shows the outgoing
/// and incoming sections moving together.
pub struct DeckWidget;

impl DeckWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        if area.is_empty() {
            return;
        }
        let view = app.deck.container();
        let height = area.height as i32;

        for section in &view.sections {
            let top = (section.top + view.offset).round() as i32;
            if top >= height || top + height <= 0 {
                continue;
            }
            let Some(&kind) = app.sections.get(section.index) else {
                continue;
            };

            let local = Rect::new(0, 0, area.width, area.height);
            let mut scratch = Buffer::empty(local);
            sections::render(kind, section.index, section.hidden, local, &mut scratch, app);
            blit(&scratch, frame.buffer_mut(), area, top);
        }
    }
}

/// Copy `src` into `area` of `dst`, shifted down by `top` rows and clipped
fn blit(src: &Buffer, dst: &mut Buffer, area: Rect, top: i32) {
    for y in 0..src.area.height {
        let target = top + y as i32;
        if target < 0 || target >= area.height as i32 {
            continue;
        }
        for x in 0..src.area.width.min(area.width) {
            if let (Some(from), Some(to)) = (
                src.cell((x, y)),
                dst.cell_mut((area.x + x, area.y + target as u16)),
            ) {
                *to = from.clone();
            }
        }
    }
}
