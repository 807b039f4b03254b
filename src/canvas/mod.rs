//! Rendered canvas: viewport scale state, drag selection, and the decoded
//! bitmap behind it.
pub mod bitmap;
pub mod crop;
pub mod selection;
pub mod viewport;

pub use bitmap::{Bitmap, RenderedView};
pub use crop::{crop_region, encode_png, CropPreview};
pub use selection::{Release, SelectionMachine, SelectionPhase};
pub use viewport::{Viewport, ZoomInput};
