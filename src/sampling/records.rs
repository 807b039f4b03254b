use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geometry::Rect;
use crate::sampling::color::ColorSample;

#[derive(Debug, Clone, Serialize)]
pub struct SingleColorRecord {
    pub sample: ColorSample,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaColorRecord {
    /// Rounded original-space rectangle; identity key for upserts.
    pub area: Rect,
    pub samples: Vec<ColorSample>,
    pub timestamp: DateTime<Utc>,
}

impl AreaColorRecord {
    /// Clipboard form `"x|y|HEX","x|y|HEX",...`.
    pub fn copy_text(&self) -> String {
        self.samples
            .iter()
            .map(|s| format!("\"{}\"", s.copy_text()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// New record at index 0.
    Inserted,
    /// An existing record with the same area was replaced in place.
    Replaced(usize),
}

/// Newest-first single and area sample logs, each capped independently.
#[derive(Debug, Clone)]
pub struct SampleRecords {
    singles: Vec<SingleColorRecord>,
    areas: Vec<AreaColorRecord>,
    selected_area: Option<usize>,
    limit: usize,
}

impl SampleRecords {
    pub fn new(limit: usize) -> Self {
        Self {
            singles: Vec::new(),
            areas: Vec::new(),
            selected_area: None,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn singles(&self) -> &[SingleColorRecord] {
        &self.singles
    }

    pub fn areas(&self) -> &[AreaColorRecord] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.singles.len() + self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push_single(&mut self, sample: ColorSample) -> &SingleColorRecord {
        self.singles.insert(
            0,
            SingleColorRecord {
                sample,
                timestamp: Utc::now(),
            },
        );
        self.singles.truncate(self.limit);
        &self.singles[0]
    }

    /// Replaces the record with exactly the same `area`, or prepends a new
    /// one. Empty sample sets are not recorded.
    pub fn upsert_area(&mut self, area: Rect, samples: Vec<ColorSample>) -> Option<Upsert> {
        if samples.is_empty() {
            return None;
        }
        let record = AreaColorRecord {
            area,
            samples,
            timestamp: Utc::now(),
        };
        if let Some(idx) = self.areas.iter().position(|r| r.area == area) {
            self.areas[idx] = record;
            return Some(Upsert::Replaced(idx));
        }

        self.areas.insert(0, record);
        self.selected_area = self
            .selected_area
            .map(|i| i + 1)
            .filter(|&i| i < self.limit);
        self.areas.truncate(self.limit);
        Some(Upsert::Inserted)
    }

    pub fn delete_single(&mut self, index: usize) -> Option<SingleColorRecord> {
        (index < self.singles.len()).then(|| self.singles.remove(index))
    }

    /// Removes an area record, keeping the selection pointer on the same
    /// record (or clearing it when that record is the one removed).
    pub fn delete_area(&mut self, index: usize) -> Option<AreaColorRecord> {
        if index >= self.areas.len() {
            return None;
        }
        self.selected_area = match self.selected_area {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Some(self.areas.remove(index))
    }

    pub fn select_area(&mut self, index: usize) -> bool {
        if index >= self.areas.len() {
            return false;
        }
        self.selected_area = Some(index);
        true
    }

    pub fn selected_area_index(&self) -> Option<usize> {
        self.selected_area
    }

    pub fn selected_area(&self) -> Option<&AreaColorRecord> {
        self.areas.get(self.selected_area?)
    }

    pub fn clear_singles(&mut self) {
        self.singles.clear();
    }

    pub fn clear_areas(&mut self) {
        self.areas.clear();
        self.selected_area = None;
    }

    pub fn clear(&mut self) {
        self.clear_singles();
        self.clear_areas();
    }
}
