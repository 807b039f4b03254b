//! Display <-> original-image space mapping.
//!
//! `original = round(display / total_scale)` and
//! `display = original * total_scale`. The rounding on the way in is what
//! makes pixel picking deterministic; the way out is exact.
use crate::canvas::Viewport;
use crate::geometry::{PixelPoint, Point, Rect, RectF};

pub fn to_original(display: Point, viewport: &Viewport) -> PixelPoint {
    let s = viewport.total_scale();
    PixelPoint {
        x: (display.x / s).round() as i32,
        y: (display.y / s).round() as i32,
    }
}

pub fn to_display(original: PixelPoint, viewport: &Viewport) -> Point {
    let s = viewport.total_scale();
    Point {
        x: original.x as f64 * s,
        y: original.y as f64 * s,
    }
}

/// Display position of the centre of an original pixel.
pub fn pixel_center_to_display(original: PixelPoint, viewport: &Viewport) -> Point {
    let s = viewport.total_scale();
    Point {
        x: (original.x as f64 + 0.5) * s,
        y: (original.y as f64 + 0.5) * s,
    }
}

/// Maps an original-space rectangle (e.g. node bounds) onto the canvas.
pub fn rect_to_display(rect: Rect, viewport: &Viewport) -> RectF {
    let s = viewport.total_scale();
    RectF {
        x: rect.x as f64 * s,
        y: rect.y as f64 * s,
        width: rect.width as f64 * s,
        height: rect.height as f64 * s,
    }
}

/// Maps a display-space rectangle back to original space without rounding.
pub fn rect_to_original(rect: RectF, viewport: &Viewport) -> RectF {
    let s = viewport.total_scale();
    RectF {
        x: rect.x / s,
        y: rect.y / s,
        width: rect.width / s,
        height: rect.height / s,
    }
}
