pub mod color;
pub mod export;
pub mod records;
pub mod sampler;

use serde::{Deserialize, Serialize};

pub use color::{rgb_to_hex, ColorSample, PixelColor};
pub use export::{multi_color_snippet, ColorExport};
pub use records::{AreaColorRecord, SampleRecords, SingleColorRecord, Upsert};
pub use sampler::{grid_layout, sample, sample_area, GridShape};

/// What a click on the canvas does besides hit-testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickMode {
    /// Hit-test only.
    #[default]
    Inspect,
    /// Hit-test and record a single-point colour sample.
    SingleColor,
}
