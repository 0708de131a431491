use image::{Rgba, RgbaImage};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Draws an RGBA image with half blocks: two pixel rows per terminal row
pub struct PixelCanvas<'a> {
    image: &'a RgbaImage,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(image: &'a RgbaImage) -> Self {
        Self { image }
    }
}

fn color(pixel: &Rgba<u8>) -> Color {
    let [r, g, b, _] = pixel.0;
    Color::Rgb(r, g, b)
}

impl Widget for PixelCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (iw, ih) = self.image.dimensions();
        if area.is_empty() || iw == 0 || ih == 0 {
            return;
        }
        let cols = area.width as u32;
        let rows = area.height as u32 * 2;

        // Nearest-neighbour sampling
        for row in 0..area.height {
            let top = ((row as u32 * 2) * ih / rows).min(ih - 1);
            let bottom = ((row as u32 * 2 + 1) * ih / rows).min(ih - 1);
            for col in 0..area.width {
                let x = (col as u32 * iw / cols).min(iw - 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol("▀")
                        .set_fg(color(self.image.get_pixel(x, top)))
                        .set_bg(color(self.image.get_pixel(x, bottom)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_blocks_take_top_and_bottom_rows() {
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));

        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        PixelCanvas::new(&image).render(area, &mut buf);

        for x in 0..3 {
            let cell = buf.cell((x, 0)).unwrap();
            assert_eq!(cell.symbol(), "▀");
            assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
            assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
        }
    }

    #[test]
    fn test_empty_area_is_noop() {
        let image = RgbaImage::new(4, 4);
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 2));
        PixelCanvas::new(&image).render(Rect::new(0, 0, 0, 0), &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), " ");
    }
}
