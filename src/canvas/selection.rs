//! Drag-selection state machine: `Idle -> Selecting -> (Committed | Idle)`.
//!
//! All coordinates here are display space. Conversion to original space
//! happens on demand through the viewport.
use serde::Serialize;

use crate::canvas::Viewport;
use crate::geometry::{self, Point, Rect, RectF};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SelectionPhase {
    Idle,
    Selecting { start: Point, end: Point },
    Committed { start: Point, end: Point },
}

/// What a pointer release turned into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// No drag was in progress.
    Ignored,
    /// The drag was below the click threshold; the selection was discarded.
    Click(Point),
    /// A selection was frozen with this display-space rectangle.
    Committed(RectF),
}

#[derive(Debug, Clone)]
pub struct SelectionMachine {
    phase: SelectionPhase,
    click_threshold: f64,
}

impl SelectionMachine {
    pub fn new(click_threshold: f64) -> Self {
        Self {
            phase: SelectionPhase::Idle,
            click_threshold,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.phase, SelectionPhase::Selecting { .. })
    }

    /// Primary-button press. Only presses on the canvas start a drag.
    pub fn press(&mut self, p: Point, viewport: &Viewport) -> bool {
        if !viewport.contains(p) {
            return false;
        }
        self.phase = SelectionPhase::Selecting { start: p, end: p };
        true
    }

    /// Pointer move. Returns the live selection box while dragging.
    pub fn drag(&mut self, p: Point, viewport: &Viewport) -> Option<RectF> {
        let SelectionPhase::Selecting { start, .. } = self.phase else {
            return None;
        };
        let end = viewport.clamp(p);
        self.phase = SelectionPhase::Selecting { start, end };
        Some(RectF::from_points(start, end))
    }

    pub fn release(&mut self, p: Point, viewport: &Viewport) -> Release {
        let SelectionPhase::Selecting { start, .. } = self.phase else {
            return Release::Ignored;
        };
        let end = viewport.clamp(p);
        self.finish(start, end)
    }

    /// Pointer left the canvas mid-drag: release at the last clamped point.
    pub fn leave(&mut self) -> Release {
        let SelectionPhase::Selecting { start, end } = self.phase else {
            return Release::Ignored;
        };
        self.finish(start, end)
    }

    fn finish(&mut self, start: Point, end: Point) -> Release {
        let rect = RectF::from_points(start, end);
        if rect.width < self.click_threshold || rect.height < self.click_threshold {
            self.phase = SelectionPhase::Idle;
            return Release::Click(end);
        }
        self.phase = SelectionPhase::Committed { start, end };
        Release::Committed(rect)
    }

    pub fn reset(&mut self) {
        self.phase = SelectionPhase::Idle;
    }

    /// Box to draw: the live drag or the committed selection.
    pub fn display_rect(&self) -> Option<RectF> {
        match self.phase {
            SelectionPhase::Idle => None,
            SelectionPhase::Selecting { start, end } | SelectionPhase::Committed { start, end } => {
                Some(RectF::from_points(start, end))
            }
        }
    }

    pub fn committed_rect(&self) -> Option<RectF> {
        match self.phase {
            SelectionPhase::Committed { start, end } => Some(RectF::from_points(start, end)),
            _ => None,
        }
    }

    /// Committed selection in original space, unrounded.
    pub fn crop_rect(&self, viewport: &Viewport) -> Option<RectF> {
        self.committed_rect()
            .map(|r| geometry::rect_to_original(r, viewport))
    }

    /// Committed selection in original space, each field rounded.
    pub fn crop_rect_rounded(&self, viewport: &Viewport) -> Option<Rect> {
        self.crop_rect(viewport).map(|r| r.round())
    }
}
