//! Points, rectangles and the display <-> original coordinate transform.
pub mod transform;
pub mod types;

pub use transform::{
    pixel_center_to_display, rect_to_display, rect_to_original, to_display, to_original,
};
pub use types::{PixelPoint, Point, Rect, RectF};
