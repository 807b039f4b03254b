//! Pixel reads against the rendered canvas and grid layout for area sampling.
use crate::canvas::RenderedView;
use crate::geometry::{self, PixelPoint, Point, RectF};
use crate::sampling::color::{ColorSample, PixelColor};

/// Reads the canvas pixel under `at` (display space) and tags it with the
/// matching original-image position. Out-of-canvas reads are `None`.
pub fn sample(view: &RenderedView<'_>, at: Point) -> Option<ColorSample> {
    match view.pixel_at(at) {
        Ok(px) => {
            let position = geometry::to_original(at, view.viewport());
            Some(ColorSample::new(position, PixelColor::from(px)))
        }
        Err(e) => {
            tracing::debug!(x = at.x, y = at.y, error = %e, "sample skipped");
            None
        }
    }
}

/// Rows and columns of an area-sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    /// `cols = round(sqrt(n * w / h))`, `rows = round(n / cols)`, both at
    /// least 1. `None` for an empty rectangle or a zero point count.
    pub fn for_area(width: f64, height: f64, point_count: usize) -> Option<Self> {
        if point_count == 0 || !(width > 0.0) || !(height > 0.0) {
            return None;
        }
        let n = point_count as f64;
        let cols = ((n * width / height).sqrt().round() as usize).max(1);
        let rows = ((n / cols as f64).round() as usize).max(1);
        Some(Self { rows, cols })
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interior grid points of `rect` (original space), row-major. Edges are
/// never sampled: step is `width / (cols + 1)`.
pub fn grid_layout(rect: RectF, point_count: usize) -> Vec<PixelPoint> {
    let Some(shape) = GridShape::for_area(rect.width, rect.height, point_count) else {
        return Vec::new();
    };
    let step_x = rect.width / (shape.cols + 1) as f64;
    let step_y = rect.height / (shape.rows + 1) as f64;

    let mut points = Vec::with_capacity(shape.len());
    for row in 1..=shape.rows {
        for col in 1..=shape.cols {
            points.push(PixelPoint::new(
                (rect.x + col as f64 * step_x).round() as i32,
                (rect.y + row as f64 * step_y).round() as i32,
            ));
        }
    }
    points
}

/// Samples every grid point of `rect`. Each point is read at the centre of
/// its pixel in display space, so at zoom >= 1 the colour always belongs to
/// the recorded position. Points that fall off the canvas are dropped, so the
/// result may be shorter than the grid.
pub fn sample_area(view: &RenderedView<'_>, rect: RectF, point_count: usize) -> Vec<ColorSample> {
    let samples: Vec<ColorSample> = grid_layout(rect, point_count)
        .into_iter()
        .filter_map(|original| {
            let centre = geometry::pixel_center_to_display(original, view.viewport());
            match view.pixel_at(centre) {
                Ok(px) => Some(ColorSample::new(original, PixelColor::from(px))),
                Err(e) => {
                    tracing::debug!(x = original.x, y = original.y, error = %e, "grid point skipped");
                    None
                }
            }
        })
        .collect();
    tracing::debug!(
        requested = point_count,
        sampled = samples.len(),
        "area sampled"
    );
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Bitmap, Viewport};
    use crate::config::ViewportConfig;
    use image::{Rgba, RgbaImage};

    fn gradient(w: u32, h: u32) -> Bitmap {
        Bitmap::new(RgbaImage::from_fn(w, h, |x, y| {
            Rgba([x as u8, y as u8, 7, 255])
        }))
    }

    #[test]
    fn grid_of_25_over_2_to_1_is_7_by_4() {
        let rect = RectF::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            GridShape::for_area(rect.width, rect.height, 25),
            Some(GridShape { rows: 4, cols: 7 })
        );
        let points = grid_layout(rect, 25);
        assert_eq!(points.len(), 28);
        for p in &points {
            assert!(p.x > 0 && p.x < 100, "x on edge: {p:?}");
            assert!(p.y > 0 && p.y < 50, "y on edge: {p:?}");
        }
        assert_eq!(points[0], PixelPoint::new(13, 10));
        assert_eq!(points[27], PixelPoint::new(88, 40));
    }

    #[test]
    fn grid_is_row_major() {
        let points = grid_layout(RectF::new(10.0, 20.0, 30.0, 30.0), 4);
        assert_eq!(
            points,
            vec![
                PixelPoint::new(20, 30),
                PixelPoint::new(30, 30),
                PixelPoint::new(20, 40),
                PixelPoint::new(30, 40),
            ]
        );
    }

    #[test]
    fn degenerate_grids_are_empty() {
        assert!(grid_layout(RectF::new(0.0, 0.0, 0.0, 50.0), 25).is_empty());
        assert!(grid_layout(RectF::new(0.0, 0.0, 50.0, 0.0), 25).is_empty());
        assert!(grid_layout(RectF::new(0.0, 0.0, 50.0, 50.0), 0).is_empty());
    }

    #[test]
    fn very_wide_area_keeps_one_row() {
        let shape = GridShape::for_area(1000.0, 10.0, 1).unwrap();
        assert_eq!(shape, GridShape { rows: 1, cols: 10 });
    }

    #[test]
    fn single_sample_reports_original_position() {
        let bitmap = gradient(200, 100);
        let v = Viewport::fitted(200, 100, 100.0, 100.0, &ViewportConfig::default());
        let view = RenderedView::new(&bitmap, &v);
        let s = sample(&view, Point::new(10.4, 20.0)).unwrap();
        assert_eq!(s.position(), PixelPoint::new(21, 40));
        // At half scale one canvas pixel covers two original pixels: the
        // position is the rounded pointer, the colour is what the canvas
        // shows. They may differ by one original pixel.
        assert_eq!(s.color, PixelColor::new(21, 41, 7, 255));
        assert!((s.color.r as i32 - s.x).abs() <= 1);
        assert!((s.color.g as i32 - s.y).abs() <= 1);
        assert!(sample(&view, Point::new(100.0, 0.0)).is_none());
    }

    #[test]
    fn area_colors_match_positions_across_zoom_steps() {
        let bitmap = gradient(200, 200);
        for base in [1.0, 0.5] {
            let side = 200.0 * base;
            let mut v = Viewport::fitted(200, 200, side, side, &ViewportConfig::default());
            for _ in 0..15 {
                v.zoom(crate::canvas::ZoomInput::In);
                if v.total_scale() < 1.0 {
                    continue;
                }
                let view = RenderedView::new(&bitmap, &v);
                let samples = sample_area(&view, RectF::new(10.0, 10.0, 180.0, 180.0), 100);
                assert_eq!(samples.len(), 100);
                for s in &samples {
                    assert_eq!(
                        (s.color.r as i32, s.color.g as i32),
                        (s.x, s.y),
                        "colour/position mismatch at scale {}",
                        v.total_scale()
                    );
                }
            }
        }
    }

    #[test]
    fn area_samples_use_original_coordinates() {
        let bitmap = gradient(200, 100);
        let mut v = Viewport::new(200, 100, &ViewportConfig::default());
        v.zoom_by(1.0);
        let view = RenderedView::new(&bitmap, &v);
        let samples = sample_area(&view, RectF::new(0.0, 0.0, 100.0, 50.0), 25);
        assert_eq!(samples.len(), 28);
        for s in &samples {
            assert_eq!(s.color.r as i32, s.x);
            assert_eq!(s.color.g as i32, s.y);
        }
    }
}
