use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{InspectorError, InspectorResult};
use crate::geometry::{PixelPoint, Rect};
use crate::sampling::color::ColorSample;
use crate::sampling::records::{AreaColorRecord, SampleRecords, SingleColorRecord};

pub const NO_SELECTION_SNIPPET: &str = "// Select a multi-point color record to generate code";

/// Default colour tolerance written into generated search snippets.
pub const SNIPPET_THRESHOLD: u32 = 15;

#[derive(Debug, Clone, Serialize)]
pub struct ColorValue {
    pub hex: String,
    pub rgb: String,
    pub rgba: String,
}

impl From<&ColorSample> for ColorValue {
    fn from(s: &ColorSample) -> Self {
        Self {
            hex: s.hex(),
            rgb: s.rgb(),
            rgba: s.rgba(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleColorItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub position: PixelPoint,
    pub color: ColorValue,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaPoint {
    pub position: PixelPoint,
    pub color: ColorValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiColorItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub area: Rect,
    pub point_count: usize,
    pub colors: Vec<AreaPoint>,
    pub timestamp: DateTime<Utc>,
}

/// One-way JSON dump of every recorded sample.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorExport {
    pub export_time: DateTime<Utc>,
    pub total_items: usize,
    pub single_color_items: Vec<SingleColorItem>,
    pub multi_color_items: Vec<MultiColorItem>,
}

impl ColorExport {
    pub fn from_records(records: &SampleRecords) -> InspectorResult<Self> {
        if records.is_empty() {
            return Err(InspectorError::Export("no color samples to export".to_string()));
        }
        Ok(Self {
            export_time: Utc::now(),
            total_items: records.len(),
            single_color_items: records.singles().iter().map(single_item).collect(),
            multi_color_items: records.areas().iter().map(area_item).collect(),
        })
    }

    pub fn to_json(&self) -> InspectorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> InspectorResult<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(
            path = %path.display(),
            items = self.total_items,
            "color samples exported"
        );
        Ok(())
    }
}

fn single_item(record: &SingleColorRecord) -> SingleColorItem {
    SingleColorItem {
        kind: "single",
        position: record.sample.position(),
        color: ColorValue::from(&record.sample),
        timestamp: record.timestamp,
    }
}

fn area_item(record: &AreaColorRecord) -> MultiColorItem {
    MultiColorItem {
        kind: "area",
        area: record.area,
        point_count: record.samples.len(),
        colors: record
            .samples
            .iter()
            .map(|s| AreaPoint {
                position: s.position(),
                color: ColorValue::from(s),
            })
            .collect(),
        timestamp: record.timestamp,
    }
}

/// Multi-colour search snippet: the first sample is the anchor, every other
/// sample is an offset from it.
pub fn multi_color_snippet(record: Option<&AreaColorRecord>) -> String {
    let Some(record) = record else {
        return NO_SELECTION_SNIPPET.to_string();
    };
    let Some((anchor, rest)) = record.samples.split_first() else {
        return NO_SELECTION_SNIPPET.to_string();
    };
    let area = record.area;

    let offsets = rest
        .iter()
        .map(|s| {
            format!(
                "    [{}, {}, \"{}\"]",
                s.x - anchor.x,
                s.y - anchor.y,
                s.hex()
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "let point = findMultiColors(img, \"{}\", [\n{}\n], {{\n    region: [{}, {}, {}, {}],\n    threshold: {}\n}});",
        anchor.hex(),
        offsets,
        area.x,
        area.y,
        area.width,
        area.height,
        SNIPPET_THRESHOLD
    )
}
