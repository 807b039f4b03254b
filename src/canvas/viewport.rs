use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::geometry::Point;

/// A zoom request coming from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoomInput {
    /// Zoom-in button.
    In,
    /// Zoom-out button.
    Out,
    /// One mouse-wheel notch. Positive `delta_y` (scrolling down) zooms out.
    Wheel { delta_y: f64 },
}

/// Scale state of the rendered canvas.
///
/// `total_scale = base_scale * zoom_level` is always strictly positive.
#[derive(Debug, Clone)]
pub struct Viewport {
    base_scale: f64,
    zoom_level: f64,
    original_width: u32,
    original_height: u32,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(original_width: u32, original_height: u32, config: &ViewportConfig) -> Self {
        Self {
            base_scale: 1.0,
            zoom_level: 1.0,
            original_width,
            original_height,
            config: config.clone(),
        }
    }

    /// A viewport fitted into a `container_width x container_height` area.
    pub fn fitted(
        original_width: u32,
        original_height: u32,
        container_width: f64,
        container_height: f64,
        config: &ViewportConfig,
    ) -> Self {
        let mut viewport = Self::new(original_width, original_height, config);
        viewport.fit_to_window(container_width, container_height);
        viewport
    }

    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    pub fn total_scale(&self) -> f64 {
        self.base_scale * self.zoom_level
    }

    pub fn original_size(&self) -> (u32, u32) {
        (self.original_width, self.original_height)
    }

    /// Pixel size of the rendered canvas.
    pub fn canvas_size(&self) -> (u32, u32) {
        let s = self.total_scale();
        (
            (self.original_width as f64 * s).floor() as u32,
            (self.original_height as f64 * s).floor() as u32,
        )
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.total_scale() * 100.0).round() as u32
    }

    /// Applies a zoom request. Returns `false` when the clamped zoom level
    /// did not change, in which case nothing needs to be redrawn.
    pub fn zoom(&mut self, input: ZoomInput) -> bool {
        let delta = match input {
            ZoomInput::In => self.config.button_zoom_step,
            ZoomInput::Out => -self.config.button_zoom_step,
            ZoomInput::Wheel { delta_y } if delta_y > 0.0 => -self.config.wheel_zoom_step,
            ZoomInput::Wheel { .. } => self.config.wheel_zoom_step,
        };
        self.zoom_by(delta)
    }

    pub fn zoom_by(&mut self, delta: f64) -> bool {
        // Snap so repeated steps land on exact multiples of the step size.
        let next = (((self.zoom_level + delta) * 1e9).round() / 1e9)
            .clamp(self.config.min_zoom, self.config.max_zoom);
        if next == self.zoom_level {
            return false;
        }
        tracing::debug!(from = self.zoom_level, to = next, "zoom level changed");
        self.zoom_level = next;
        true
    }

    pub fn reset_zoom(&mut self) -> bool {
        if self.zoom_level == 1.0 {
            return false;
        }
        self.zoom_level = 1.0;
        true
    }

    /// `base_scale = min(cw / iw, ch / ih, 1)` and `zoom_level = 1`.
    ///
    /// A container that would yield a non-positive scale leaves the viewport
    /// untouched and returns `false`.
    pub fn fit_to_window(&mut self, container_width: f64, container_height: f64) -> bool {
        let iw = self.original_width.max(1) as f64;
        let ih = self.original_height.max(1) as f64;
        let scale = (container_width / iw).min(container_height / ih).min(1.0);
        if !(scale > 0.0) || !scale.is_finite() {
            tracing::warn!(
                container_width,
                container_height,
                "container too small to fit image; keeping current scale"
            );
            return false;
        }
        self.base_scale = scale;
        self.zoom_level = 1.0;
        true
    }

    /// Whether `p` lies on the rendered canvas (right/bottom edges excluded).
    pub fn contains(&self, p: Point) -> bool {
        let (w, h) = self.canvas_size();
        p.x >= 0.0 && p.y >= 0.0 && p.x < w as f64 && p.y < h as f64
    }

    /// Clamps `p` to `[0, canvas_width] x [0, canvas_height]`.
    pub fn clamp(&self, p: Point) -> Point {
        let (w, h) = self.canvas_size();
        Point {
            x: p.x.clamp(0.0, w as f64),
            y: p.y.clamp(0.0, h as f64),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_scale(&mut self, base_scale: f64, zoom_level: f64) {
        self.base_scale = base_scale;
        self.zoom_level = zoom_level;
    }
}
