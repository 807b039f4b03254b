//! The inspection session: one bitmap, one viewport, one selection, one
//! hierarchy and the sample logs, driven by pointer and zoom input.
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use crate::canvas::{
    crop_region, Bitmap, CropPreview, Release, RenderedView, SelectionMachine, SelectionPhase,
    Viewport, ZoomInput,
};
use crate::config::InspectorConfig;
use crate::errors::{InspectorError, InspectorResult};
use crate::geometry::{self, PixelPoint, Point, Rect, RectF};
use crate::hierarchy::{Hierarchy, NodeId, UiNode};
use crate::sampling::{
    self, multi_color_snippet, ColorExport, ColorSample, PickMode, SampleRecords, Upsert,
};
use crate::session::capture::{CaptureSource, Snapshot};
use crate::session::events::{EventBus, InspectorCommand, InspectorEvent};
use crate::session::history::{History, HistoryEntry};

/// What a pointer release resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerOutcome {
    Ignored,
    Click {
        position: PixelPoint,
        node: Option<NodeId>,
        sample: Option<ColorSample>,
    },
    Selected {
        display: RectF,
        original: Rect,
    },
}

struct Image {
    bitmap: Bitmap,
    viewport: Viewport,
}

pub struct Inspector {
    config: InspectorConfig,
    image: Option<Image>,
    generation: u64,
    selection: SelectionMachine,
    hierarchy: Hierarchy,
    records: SampleRecords,
    last_area: Option<Rect>,
    pick_mode: PickMode,
    point_count: usize,
    history: Option<History>,
    bus: EventBus,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            selection: SelectionMachine::new(config.selection.click_threshold),
            records: SampleRecords::new(config.sampling.history_limit),
            point_count: (config.sampling.point_count as usize).max(1),
            config,
            image: None,
            generation: 0,
            hierarchy: Hierarchy::new(),
            last_area: None,
            pick_mode: PickMode::default(),
            history: None,
            bus: EventBus::new(),
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InspectorEvent> {
        self.bus.subscribe()
    }

    /// Take senders before calling [`Inspector::run`]; afterwards this is `None`.
    pub fn command_sender(&self) -> Option<mpsc::Sender<InspectorCommand>> {
        self.bus.command_sender()
    }

    /// Installs a new bitmap. Everything tied to the previous image
    /// (selection, highlighted node) is discarded. With a container the
    /// image is fitted into it, otherwise it is shown at 1:1.
    pub fn load_image(&mut self, bitmap: Bitmap, container: Option<(f64, f64)>) -> u64 {
        let (w, h) = (bitmap.width(), bitmap.height());
        let viewport = match container {
            Some((cw, ch)) => Viewport::fitted(w, h, cw, ch, &self.config.viewport),
            None => Viewport::new(w, h, &self.config.viewport),
        };
        self.image = Some(Image { bitmap, viewport });
        self.generation += 1;
        self.clear_selection();
        self.hierarchy.deselect();

        tracing::info!(generation = self.generation, width = w, height = h, "image loaded");
        self.bus.send(InspectorEvent::ImageLoaded {
            generation: self.generation,
            width: w,
            height: h,
        });
        self.publish_viewport();
        self.generation
    }

    /// Parses and installs a hierarchy dump. On failure the old tree is gone
    /// too and the error is returned to the caller.
    pub fn load_hierarchy(&mut self, text: &str) -> InspectorResult<usize> {
        match self.hierarchy.load(text) {
            Ok(root) => {
                let nodes = root.node_count();
                self.bus.send(InspectorEvent::HierarchyLoaded { nodes });
                Ok(nodes)
            }
            Err(e) => {
                self.bus.send(InspectorEvent::HierarchyCleared);
                Err(e)
            }
        }
    }

    pub fn clear_hierarchy(&mut self) {
        self.hierarchy.clear();
        self.bus.send(InspectorEvent::HierarchyCleared);
    }

    /// Installs a decoded snapshot. A dump that does not parse is treated as
    /// absent.
    pub fn load_snapshot(&mut self, snapshot: Snapshot, container: Option<(f64, f64)>) -> u64 {
        let generation = self.load_image(snapshot.bitmap, container);
        match snapshot.hierarchy_text {
            Some(text) => {
                if let Err(e) = self.load_hierarchy(&text) {
                    tracing::warn!(error = %e, "snapshot hierarchy ignored");
                }
            }
            None => self.clear_hierarchy(),
        }
        generation
    }

    /// Captures, decodes and installs a snapshot, recording it in the
    /// history when one is attached.
    pub async fn load_capture(
        &mut self,
        source: &dyn CaptureSource,
        container: Option<(f64, f64)>,
    ) -> InspectorResult<u64> {
        let capture = source.capture().await?;
        tracing::debug!(source = source.name(), file = %capture.file_name, "capture received");
        let snapshot = Snapshot::load(capture.clone()).await?;
        if let Some(history) = self.history.as_mut() {
            history.record(HistoryEntry::from_capture(&capture));
        }
        Ok(self.load_snapshot(snapshot, container))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.image.as_ref().map(|i| &i.bitmap)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.image.as_ref().map(|i| &i.viewport)
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn records(&self) -> &SampleRecords {
        &self.records
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn history_mut(&mut self) -> Option<&mut History> {
        self.history.as_mut()
    }

    pub fn zoom(&mut self, input: ZoomInput) -> bool {
        self.change_viewport(|v| v.zoom(input))
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.change_viewport(Viewport::reset_zoom)
    }

    pub fn fit_to_window(&mut self, container_width: f64, container_height: f64) -> bool {
        self.change_viewport(|v| v.fit_to_window(container_width, container_height))
    }

    /// Display-space selections are stale after any rescale.
    fn change_viewport(&mut self, op: impl FnOnce(&mut Viewport) -> bool) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        if !op(&mut image.viewport) {
            return false;
        }
        self.clear_selection();
        self.publish_viewport();
        true
    }

    fn publish_viewport(&self) {
        if let Some(v) = self.viewport() {
            let (canvas_width, canvas_height) = v.canvas_size();
            self.bus.send(InspectorEvent::ViewportChanged {
                zoom_percent: v.zoom_percent(),
                canvas_width,
                canvas_height,
            });
        }
    }

    /// Original-image coordinates under the pointer, if it is on the canvas.
    pub fn crosshair(&self, display: Point) -> Option<PixelPoint> {
        let v = self.viewport()?;
        v.contains(display)
            .then(|| geometry::to_original(display, v))
    }

    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    /// Live or committed selection box in display space.
    pub fn selection_rect(&self) -> Option<RectF> {
        self.selection.display_rect()
    }

    pub fn pointer_down(&mut self, display: Point) -> bool {
        let Some(image) = self.image.as_ref() else {
            return false;
        };
        let had_selection = self.selection.committed_rect().is_some();
        let started = self.selection.press(display, &image.viewport);
        if started && had_selection {
            self.bus.send(InspectorEvent::SelectionCleared);
        }
        started
    }

    pub fn pointer_move(&mut self, display: Point) -> Option<RectF> {
        let image = self.image.as_ref()?;
        self.selection.drag(display, &image.viewport)
    }

    pub fn pointer_up(&mut self, display: Point) -> PointerOutcome {
        let Some(image) = self.image.as_ref() else {
            return PointerOutcome::Ignored;
        };
        let release = self.selection.release(display, &image.viewport);
        self.finish_release(release)
    }

    pub fn pointer_leave(&mut self) -> PointerOutcome {
        let release = self.selection.leave();
        self.finish_release(release)
    }

    fn finish_release(&mut self, release: Release) -> PointerOutcome {
        let Some(viewport) = self.viewport().cloned() else {
            return PointerOutcome::Ignored;
        };
        match release {
            Release::Ignored => PointerOutcome::Ignored,
            Release::Click(at) => {
                self.bus.send(InspectorEvent::SelectionCleared);
                let position = geometry::to_original(at, &viewport);
                let sample = match self.pick_mode {
                    PickMode::SingleColor => self.sample_at(at),
                    PickMode::Inspect => None,
                };
                let node = self.select_node_at(position).map(|n| n.id);
                PointerOutcome::Click {
                    position,
                    node,
                    sample,
                }
            }
            Release::Committed(display) => {
                let original = geometry::rect_to_original(display, &viewport).round();
                tracing::debug!(
                    x = original.x,
                    y = original.y,
                    width = original.width,
                    height = original.height,
                    "selection committed"
                );
                self.bus
                    .send(InspectorEvent::SelectionCommitted { display, original });
                PointerOutcome::Selected { display, original }
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.phase() != SelectionPhase::Idle {
            self.selection.reset();
            self.bus.send(InspectorEvent::SelectionCleared);
        }
    }

    /// Committed selection in original space, unrounded.
    pub fn crop_rect(&self) -> Option<RectF> {
        self.selection.crop_rect(self.viewport()?)
    }

    /// Hit-tests an original-space point and selects the result.
    pub fn select_node_at(&mut self, position: PixelPoint) -> Option<&UiNode> {
        if !self.hierarchy.is_loaded() {
            return None;
        }
        match self.hierarchy.select_at(position) {
            Some(node) => {
                self.bus.send(InspectorEvent::NodeSelected {
                    id: node.id,
                    label: node.display_label(),
                    bounds: node.bounds(),
                });
                Some(node)
            }
            None => {
                tracing::debug!(x = position.x, y = position.y, "no node at point");
                self.bus.send(InspectorEvent::NodeMiss { position });
                None
            }
        }
    }

    pub fn select_node(&mut self, id: NodeId) -> bool {
        if !self.hierarchy.select(id) {
            return false;
        }
        if let Some(node) = self.hierarchy.selected() {
            self.bus.send(InspectorEvent::NodeSelected {
                id: node.id,
                label: node.display_label(),
                bounds: node.bounds(),
            });
        }
        true
    }

    /// Display-space box of the selected node.
    pub fn highlight_rect(&self) -> Option<RectF> {
        self.hierarchy.highlight_rect(self.viewport()?)
    }

    pub fn pick_mode(&self) -> PickMode {
        self.pick_mode
    }

    pub fn set_pick_mode(&mut self, mode: PickMode) {
        self.pick_mode = mode;
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn set_point_count(&mut self, n: usize) {
        self.point_count = n.max(1);
    }

    /// Reads the colour under the pointer without recording it.
    pub fn preview_color(&self, display: Point) -> Option<ColorSample> {
        let image = self.image.as_ref()?;
        sampling::sample(&RenderedView::new(&image.bitmap, &image.viewport), display)
    }

    /// Samples and records the colour under `display`.
    pub fn sample_at(&mut self, display: Point) -> Option<ColorSample> {
        let sample = self.preview_color(display)?;
        self.records.push_single(sample);
        tracing::debug!(x = sample.x, y = sample.y, hex = %sample.hex(), "color sampled");
        self.bus.send(InspectorEvent::ColorSampled { sample });
        Some(sample)
    }

    /// Grid-samples the committed selection.
    pub fn sample_selection(&mut self) -> InspectorResult<Option<Upsert>> {
        if self.image.is_none() {
            return Err(InspectorError::NoImage);
        }
        let rect = self.crop_rect().ok_or(InspectorError::NoActiveSelection)?;
        self.sample_region(rect)
    }

    /// Re-samples the last sampled area, or the committed selection when
    /// nothing has been sampled yet.
    pub fn resample_last_area(&mut self) -> InspectorResult<Option<Upsert>> {
        if self.image.is_none() {
            return Err(InspectorError::NoImage);
        }
        let rect = match self.last_area {
            Some(area) => RectF::from(area),
            None => self
                .crop_rect()
                .map(|r| RectF::from(r.round()))
                .ok_or(InspectorError::NoActiveSelection)?,
        };
        self.sample_region(rect)
    }

    /// Grid-samples an original-space rectangle and upserts the record.
    /// `Ok(None)` when no grid point landed on the image.
    pub fn sample_region(&mut self, rect: RectF) -> InspectorResult<Option<Upsert>> {
        let image = self.image.as_ref().ok_or(InspectorError::NoImage)?;
        let area = rect.round();
        if area.width == 0 || area.height == 0 {
            return Err(InspectorError::NoActiveSelection);
        }
        let view = RenderedView::new(&image.bitmap, &image.viewport);
        let samples = sampling::sample_area(&view, rect, self.point_count);
        self.last_area = Some(area);

        let point_count = samples.len();
        let outcome = self.records.upsert_area(area, samples);
        if let Some(upsert) = outcome {
            self.bus.send(InspectorEvent::AreaSampled {
                area,
                point_count,
                replaced: matches!(upsert, Upsert::Replaced(_)),
            });
        }
        Ok(outcome)
    }

    pub fn last_area(&self) -> Option<Rect> {
        self.last_area
    }

    pub fn delete_single(&mut self, index: usize) -> bool {
        self.records.delete_single(index).is_some()
    }

    pub fn delete_area(&mut self, index: usize) -> bool {
        self.records.delete_area(index).is_some()
    }

    pub fn select_area_record(&mut self, index: usize) -> bool {
        self.records.select_area(index)
    }

    pub fn clear_singles(&mut self) {
        self.records.clear_singles();
    }

    pub fn clear_areas(&mut self) {
        self.records.clear_areas();
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    /// Search snippet for the selected area record.
    pub fn multi_color_snippet(&self) -> String {
        multi_color_snippet(self.records.selected_area())
    }

    pub fn export(&self) -> InspectorResult<ColorExport> {
        ColorExport::from_records(&self.records)
    }

    pub fn crop_selection(&self) -> InspectorResult<CropPreview> {
        let image = self.image.as_ref().ok_or(InspectorError::NoImage)?;
        let region = self
            .selection
            .crop_rect_rounded(&image.viewport)
            .ok_or(InspectorError::NoActiveSelection)?;
        crop_region(&image.bitmap, region, self.config.sampling.crop_preview_max)
    }

    pub fn crop(&self, region: Rect) -> InspectorResult<CropPreview> {
        let image = self.image.as_ref().ok_or(InspectorError::NoImage)?;
        crop_region(&image.bitmap, region, self.config.sampling.crop_preview_max)
    }

    /// Applies one presentation-layer command. Returns `false` on shutdown.
    pub fn handle(&mut self, command: InspectorCommand) -> bool {
        match command {
            InspectorCommand::PointerDown { position } => {
                self.pointer_down(position);
            }
            InspectorCommand::PointerMove { position } => {
                self.pointer_move(position);
            }
            InspectorCommand::PointerUp { position } => {
                self.pointer_up(position);
            }
            InspectorCommand::PointerLeave => {
                self.pointer_leave();
            }
            InspectorCommand::Zoom { input } => {
                self.zoom(input);
            }
            InspectorCommand::ResetZoom => {
                self.reset_zoom();
            }
            InspectorCommand::FitToWindow { width, height } => {
                self.fit_to_window(width, height);
            }
            InspectorCommand::SetPickMode { mode } => self.set_pick_mode(mode),
            InspectorCommand::SampleSelection => {
                if let Err(e) = self.sample_selection() {
                    tracing::warn!(error = %e, "area sampling skipped");
                }
            }
            InspectorCommand::ResampleLastArea => {
                if let Err(e) = self.resample_last_area() {
                    tracing::warn!(error = %e, "re-sampling skipped");
                }
            }
            InspectorCommand::Shutdown => return false,
        }
        true
    }

    /// Processes commands until `Shutdown` or until every sender is gone.
    pub async fn run(&mut self) {
        tracing::info!("inspector command loop started");
        while let Some(command) = self.bus.recv_command().await {
            if !self.handle(command) {
                break;
            }
        }
        tracing::info!("inspector command loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::capture::FileCapture;
    use crate::session::history::JsonHistoryStore;
    use image::{Rgba, RgbaImage};

    const DUMP: &str = r#"<hierarchy>
  <node bounds="[0,0][400,400]">
    <node resource-id="pkg:id/button" text="Go" bounds="[20,20][60,60]"/>
  </node>
</hierarchy>"#;

    /// 400x400 gradient: r = x / 2, g = y / 2.
    fn bitmap() -> Bitmap {
        Bitmap::new(RgbaImage::from_fn(400, 400, |x, y| {
            Rgba([(x / 2) as u8, (y / 2) as u8, 9, 255])
        }))
    }

    /// Fitted into 200x200, so display = original / 2.
    fn inspector() -> Inspector {
        let mut i = Inspector::new(InspectorConfig::default());
        i.load_image(bitmap(), Some((200.0, 200.0)));
        i.load_hierarchy(DUMP).unwrap();
        i
    }

    fn drag(i: &mut Inspector, from: Point, to: Point) -> PointerOutcome {
        i.pointer_down(from);
        i.pointer_move(to);
        i.pointer_up(to)
    }

    #[test]
    fn click_hit_tests_in_original_space() {
        let mut i = inspector();
        let out = drag(&mut i, Point::new(20.0, 20.0), Point::new(22.0, 21.0));
        let PointerOutcome::Click { position, node, sample } = out else {
            panic!("expected click, got {out:?}");
        };
        assert_eq!(position, PixelPoint::new(44, 42));
        assert_eq!(
            i.hierarchy().find(node.unwrap()).and_then(|n| n.resource_id()),
            Some("pkg:id/button")
        );
        assert!(sample.is_none());
        assert_eq!(i.highlight_rect(), Some(RectF::new(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn click_in_color_mode_records_a_sample() {
        let mut i = inspector();
        i.set_pick_mode(PickMode::SingleColor);
        drag(&mut i, Point::new(50.0, 60.0), Point::new(50.0, 60.0));
        let rec = &i.records().singles()[0];
        assert_eq!(rec.sample.position(), PixelPoint::new(100, 120));
        assert_eq!((rec.sample.color.r, rec.sample.color.g), (50, 60));
    }

    #[test]
    fn drag_commits_and_samples_area() {
        let mut i = inspector();
        let out = drag(&mut i, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert_eq!(
            out,
            PointerOutcome::Selected {
                display: RectF::new(0.0, 0.0, 100.0, 50.0),
                original: Rect::new(0, 0, 200, 100),
            }
        );
        assert_eq!(i.sample_selection().unwrap(), Some(Upsert::Inserted));
        assert_eq!(i.records().areas()[0].samples.len(), 28);
        assert_eq!(i.sample_selection().unwrap(), Some(Upsert::Replaced(0)));
        assert_eq!(i.records().areas().len(), 1);
        assert_eq!(i.last_area(), Some(Rect::new(0, 0, 200, 100)));
    }

    #[test]
    fn zoom_discards_committed_selection() {
        let mut i = inspector();
        drag(&mut i, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert!(i.crop_rect().is_some());
        assert!(i.zoom(ZoomInput::In));
        assert_eq!(i.selection_phase(), SelectionPhase::Idle);
        assert!(matches!(
            i.sample_selection(),
            Err(InspectorError::NoActiveSelection)
        ));
    }

    #[test]
    fn no_op_zoom_keeps_selection() {
        let mut i = inspector();
        i.reset_zoom();
        drag(&mut i, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert!(!i.reset_zoom());
        assert!(i.crop_rect().is_some());
    }

    #[test]
    fn resample_uses_last_area_after_reload() {
        let mut i = inspector();
        drag(&mut i, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        i.sample_selection().unwrap();
        let generation = i.load_image(bitmap(), Some((200.0, 200.0)));
        assert_eq!(generation, 2);
        assert!(i.crop_rect().is_none());
        assert_eq!(i.resample_last_area().unwrap(), Some(Upsert::Replaced(0)));
    }

    #[test]
    fn operations_without_image_fail_cleanly() {
        let mut i = Inspector::new(InspectorConfig::default());
        assert!(!i.pointer_down(Point::new(1.0, 1.0)));
        assert_eq!(i.pointer_up(Point::new(1.0, 1.0)), PointerOutcome::Ignored);
        assert!(!i.zoom(ZoomInput::In));
        assert!(matches!(i.sample_selection(), Err(InspectorError::NoImage)));
        assert!(matches!(i.crop_selection(), Err(InspectorError::NoImage)));
        assert!(i.preview_color(Point::new(0.0, 0.0)).is_none());
        assert!(i.crosshair(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn crop_selection_uses_rounded_original_rect() {
        let mut i = inspector();
        drag(&mut i, Point::new(10.0, 10.0), Point::new(60.0, 40.0));
        let crop = i.crop_selection().unwrap();
        assert_eq!(crop.region, Rect::new(20, 20, 100, 60));
        assert_eq!(crop.image.dimensions(), (100, 60));
    }

    #[test]
    fn crosshair_reads_original_coordinates() {
        let i = inspector();
        assert_eq!(i.crosshair(Point::new(10.2, 99.9)), Some(PixelPoint::new(20, 200)));
        assert!(i.crosshair(Point::new(200.0, 0.0)).is_none());
    }

    #[test]
    fn bad_hierarchy_clears_nodes() {
        let mut i = inspector();
        assert!(i.load_hierarchy("<oops").is_err());
        assert!(!i.hierarchy().is_loaded());
        let out = drag(&mut i, Point::new(20.0, 20.0), Point::new(20.0, 20.0));
        assert!(matches!(out, PointerOutcome::Click { node: None, .. }));
    }

    #[test]
    fn events_follow_interaction() {
        let mut i = inspector();
        let mut rx = i.subscribe();
        drag(&mut i, Point::new(20.0, 20.0), Point::new(20.0, 20.0));
        assert_eq!(rx.try_recv().unwrap(), InspectorEvent::SelectionCleared);
        assert!(matches!(
            rx.try_recv().unwrap(),
            InspectorEvent::NodeSelected { .. }
        ));
        drag(&mut i, Point::new(190.0, 190.0), Point::new(190.0, 190.0));
        assert_eq!(rx.try_recv().unwrap(), InspectorEvent::SelectionCleared);
        assert!(matches!(rx.try_recv().unwrap(), InspectorEvent::NodeSelected { .. }));
    }

    #[test]
    fn snippet_follows_selected_area_record() {
        let mut i = inspector();
        i.set_point_count(4);
        i.sample_region(RectF::new(0.0, 0.0, 30.0, 30.0)).unwrap();
        assert!(i.multi_color_snippet().starts_with("//"));
        assert!(i.select_area_record(0));
        assert!(i.multi_color_snippet().contains("region: [0, 0, 30, 30]"));
        assert!(i.delete_area(0));
        assert!(i.multi_color_snippet().starts_with("//"));
    }

    #[tokio::test]
    async fn command_loop_drives_the_session() {
        let mut i = inspector();
        let tx = i.command_sender().unwrap();
        tx.send(InspectorCommand::PointerDown { position: Point::new(0.0, 0.0) })
            .await
            .unwrap();
        tx.send(InspectorCommand::PointerMove { position: Point::new(50.0, 50.0) })
            .await
            .unwrap();
        tx.send(InspectorCommand::PointerLeave).await.unwrap();
        tx.send(InspectorCommand::SampleSelection).await.unwrap();
        tx.send(InspectorCommand::Shutdown).await.unwrap();
        i.run().await;
        assert_eq!(i.records().areas().len(), 1);
        assert_eq!(i.records().areas()[0].area, Rect::new(0, 0, 100, 100));
    }

    #[tokio::test]
    async fn command_loop_stops_when_senders_are_dropped() {
        let mut i = inspector();
        let tx = i.command_sender().unwrap();
        tx.send(InspectorCommand::Zoom { input: ZoomInput::In }).await.unwrap();
        drop(tx);
        let finished = tokio::time::timeout(std::time::Duration::from_secs(2), i.run()).await;
        assert!(finished.is_ok());
        assert_eq!(i.viewport().unwrap().zoom_level(), 1.2);
    }

    #[tokio::test]
    async fn load_capture_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("shot.png");
        RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 255])).save(&png).unwrap();
        let xml = dir.path().join("ui.xml");
        std::fs::write(&xml, DUMP).unwrap();

        let history = History::open(Box::new(JsonHistoryStore::new(dir.path())), 50);
        let mut i = Inspector::new(InspectorConfig::default()).with_history(history);
        let generation = i
            .load_capture(&FileCapture::new(&png, Some(xml)), None)
            .await
            .unwrap();
        assert_eq!(generation, 1);
        assert_eq!(i.viewport().unwrap().canvas_size(), (40, 20));
        assert!(i.hierarchy().is_loaded());
        let entries = i.history().unwrap().entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].has_nodes);
    }
}
