//! Drawing surfaces
//!
//! A `Canvas` starts out owned by the UI thread. Transferring it to the
//! background consumes it and yields an `OffscreenSurface` (exclusive drawing
//! rights, sent to the worker) and a `CanvasView` (read-only, stays with the
//! UI for compositing). After the transfer the UI has no way to draw on it.

use std::path::Path;
use std::sync::Arc;

use image::{imageops, ImageFormat, Rgba, RgbaImage};
use tokio::sync::watch;

use crate::Result;

/// The 2d-context operations the compute task needs
pub trait Surface2d {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Copy of the current pixels
    fn get_image_data(&self) -> RgbaImage;
    /// Draw `image` at the origin, clipped to the surface
    fn put_image_data(&mut self, image: &RgbaImage);
}

fn blank(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
}

/// Surface owned by the UI thread
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: blank(width, height),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Hand exclusive drawing rights to a background context
    pub fn transfer_control_to_offscreen(self) -> (OffscreenSurface, CanvasView) {
        let (tx, rx) = watch::channel(Arc::new(self.pixels.clone()));
        (
            OffscreenSurface {
                pixels: self.pixels,
                frames: tx,
            },
            CanvasView { frames: rx },
        )
    }
}

impl Surface2d for Canvas {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn get_image_data(&self) -> RgbaImage {
        self.pixels.clone()
    }

    fn put_image_data(&mut self, image: &RgbaImage) {
        imageops::replace(&mut self.pixels, image, 0, 0);
    }
}

/// Drawing end of a transferred canvas; every put is published to the view
#[derive(Debug)]
pub struct OffscreenSurface {
    pixels: RgbaImage,
    frames: watch::Sender<Arc<RgbaImage>>,
}

impl OffscreenSurface {
    /// Publish the current pixels to the view
    pub fn commit(&self) {
        self.frames.send_replace(Arc::new(self.pixels.clone()));
    }
}

impl Surface2d for OffscreenSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn get_image_data(&self) -> RgbaImage {
        self.pixels.clone()
    }

    fn put_image_data(&mut self, image: &RgbaImage) {
        imageops::replace(&mut self.pixels, image, 0, 0);
        self.commit();
    }
}

/// Buffers moved through a message act as their own surface
impl Surface2d for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn get_image_data(&self) -> RgbaImage {
        self.clone()
    }

    fn put_image_data(&mut self, image: &RgbaImage) {
        imageops::replace(self, image, 0, 0);
    }
}

/// Write pixels out as a PNG file
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Compositor side of a transferred canvas
#[derive(Debug, Clone)]
pub struct CanvasView {
    frames: watch::Receiver<Arc<RgbaImage>>,
}

impl CanvasView {
    /// Latest committed frame
    pub fn latest(&self) -> Arc<RgbaImage> {
        self.frames.borrow().clone()
    }

    /// Whether a new frame arrived since the last `mark_seen`
    pub fn has_changed(&self) -> bool {
        self.frames.has_changed().unwrap_or(false)
    }

    pub fn mark_seen(&mut self) {
        self.frames.mark_unchanged();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_opaque_black() {
        let canvas = Canvas::new(4, 2);
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 2);
        assert!(canvas.pixels().pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_put_is_clipped() {
        let mut canvas = Canvas::new(2, 2);
        let big = RgbaImage::from_pixel(5, 5, Rgba([9, 9, 9, 255]));
        canvas.put_image_data(&big);
        assert_eq!(canvas.width(), 2);
        assert_eq!(*canvas.pixels().get_pixel(1, 1), Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_offscreen_puts_reach_view() {
        let (mut surface, mut view) = Canvas::new(2, 1).transfer_control_to_offscreen();
        view.mark_seen();
        assert!(!view.has_changed());

        let white = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        surface.put_image_data(&white);

        assert!(view.has_changed());
        assert_eq!(*view.latest().get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_png_reports_bad_path() {
        let image = RgbaImage::new(1, 1);
        let err = save_png(&image, Path::new("/nonexistent-dir/x.png")).unwrap_err();
        assert!(matches!(err, crate::Error::Image(_)));
    }

    #[test]
    fn test_surface_moves_to_another_thread() {
        let (mut surface, view) = Canvas::new(1, 1).transfer_control_to_offscreen();
        std::thread::spawn(move || {
            surface.put_image_data(&RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])));
        })
        .join()
        .unwrap();
        assert_eq!(*view.latest().get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }
}
