use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::canvas::Viewport;
use crate::errors::{InspectorError, InspectorResult};
use crate::geometry::{Point, Rect};

/// A fully decoded screenshot in original-image space.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn from_bytes(bytes: &[u8]) -> InspectorResult<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::new(img.to_rgba8()))
    }

    pub fn open(path: &Path) -> InspectorResult<Self> {
        let img = image::open(path)?;
        tracing::debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "bitmap decoded"
        );
        Ok(Self::new(img.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: i64, y: i64) -> InspectorResult<Rgba<u8>> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return Err(InspectorError::SampleOutOfBounds { x, y });
        }
        Ok(*self.pixels.get_pixel(x as u32, y as u32))
    }

    /// Copies `rect`, clipped to the bitmap. Fails when nothing is left.
    pub fn crop(&self, rect: Rect) -> InspectorResult<RgbaImage> {
        let x1 = rect.x.max(0) as u32;
        let y1 = rect.y.max(0) as u32;
        let x2 = (rect.right().max(0) as u32).min(self.width());
        let y2 = (rect.bottom().max(0) as u32).min(self.height());
        if x2 <= x1 || y2 <= y1 {
            return Err(InspectorError::SampleOutOfBounds {
                x: rect.x as i64,
                y: rect.y as i64,
            });
        }
        Ok(image::imageops::crop_imm(&self.pixels, x1, y1, x2 - x1, y2 - y1).to_image())
    }
}

/// Absorbs float error from accumulated zoom steps before flooring.
const SNAP_EPSILON: f64 = 1e-9;

/// The bitmap as drawn on the canvas: a nearest-neighbour view at
/// `viewport.total_scale()`.
pub struct RenderedView<'a> {
    bitmap: &'a Bitmap,
    viewport: &'a Viewport,
}

impl<'a> RenderedView<'a> {
    pub fn new(bitmap: &'a Bitmap, viewport: &'a Viewport) -> Self {
        Self { bitmap, viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        self.viewport
    }

    pub fn size(&self) -> (u32, u32) {
        self.viewport.canvas_size()
    }

    /// Reads the canvas pixel under `floor(p)`. Each canvas pixel shows the
    /// original pixel under its centre.
    pub fn pixel_at(&self, p: Point) -> InspectorResult<Rgba<u8>> {
        let (w, h) = self.size();
        let dx = (p.x + SNAP_EPSILON).floor();
        let dy = (p.y + SNAP_EPSILON).floor();
        if !(dx >= 0.0 && dy >= 0.0 && dx < w as f64 && dy < h as f64) {
            return Err(InspectorError::SampleOutOfBounds {
                x: dx as i64,
                y: dy as i64,
            });
        }
        let s = self.viewport.total_scale();
        let ox = (((dx + 0.5) / s + SNAP_EPSILON).floor() as i64).min(self.bitmap.width() as i64 - 1);
        let oy = (((dy + 0.5) / s + SNAP_EPSILON).floor() as i64).min(self.bitmap.height() as i64 - 1);
        self.bitmap.pixel(ox, oy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;

    fn quadrants() -> Bitmap {
        // 4x4: left half red, right half blue.
        let img = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        Bitmap::new(img)
    }

    #[test]
    fn raw_pixel_bounds() {
        let b = quadrants();
        assert_eq!(b.pixel(0, 0).unwrap(), Rgba([255, 0, 0, 255]));
        assert!(matches!(
            b.pixel(4, 0),
            Err(InspectorError::SampleOutOfBounds { x: 4, y: 0 })
        ));
        assert!(b.pixel(-1, 2).is_err());
    }

    #[test]
    fn rendered_view_scales_up() {
        let b = quadrants();
        let mut v = Viewport::new(4, 4, &ViewportConfig::default());
        v.zoom_by(1.0); // 2x
        let view = RenderedView::new(&b, &v);
        assert_eq!(view.size(), (8, 8));
        assert_eq!(view.pixel_at(Point::new(3.9, 7.5)).unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(view.pixel_at(Point::new(4.0, 0.0)).unwrap(), Rgba([0, 0, 255, 255]));
        assert!(view.pixel_at(Point::new(8.0, 0.0)).is_err());
        assert!(view.pixel_at(Point::new(-0.5, 0.0)).is_err());
    }

    #[test]
    fn crop_is_clipped() {
        let b = quadrants();
        let c = b.crop(Rect::new(1, 1, 10, 2)).unwrap();
        assert_eq!(c.dimensions(), (3, 2));
        assert_eq!(*c.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*c.get_pixel(2, 1), Rgba([0, 0, 255, 255]));
        assert!(b.crop(Rect::new(10, 10, 5, 5)).is_err());
    }
}
