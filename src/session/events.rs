use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};

use crate::canvas::ZoomInput;
use crate::geometry::{PixelPoint, Point, Rect, RectF};
use crate::hierarchy::NodeId;
use crate::sampling::{ColorSample, PickMode};

/// Outcomes published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InspectorEvent {
    ImageLoaded {
        generation: u64,
        width: u32,
        height: u32,
    },
    ViewportChanged {
        zoom_percent: u32,
        canvas_width: u32,
        canvas_height: u32,
    },
    SelectionCommitted {
        display: RectF,
        original: Rect,
    },
    SelectionCleared,
    NodeSelected {
        id: NodeId,
        label: String,
        bounds: Option<Rect>,
    },
    NodeMiss {
        position: PixelPoint,
    },
    ColorSampled {
        sample: ColorSample,
    },
    AreaSampled {
        area: Rect,
        point_count: usize,
        replaced: bool,
    },
    HierarchyLoaded {
        nodes: usize,
    },
    HierarchyCleared,
}

/// Input forwarded from the presentation layer, in display space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum InspectorCommand {
    PointerDown { position: Point },
    PointerMove { position: Point },
    PointerUp { position: Point },
    PointerLeave,
    Zoom { input: ZoomInput },
    ResetZoom,
    FitToWindow { width: f64, height: f64 },
    SetPickMode { mode: PickMode },
    SampleSelection,
    ResampleLastArea,
    Shutdown,
}

pub struct EventBus {
    tx: broadcast::Sender<InspectorEvent>,
    command_tx: Option<mpsc::Sender<InspectorCommand>>,
    command_rx: mpsc::Receiver<InspectorCommand>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        let (command_tx, command_rx) = mpsc::channel(100);

        Self {
            tx,
            command_tx: Some(command_tx),
            command_rx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InspectorEvent> {
        self.tx.subscribe()
    }

    /// Publishes `event`. Having no subscribers is fine.
    pub fn send(&self, event: InspectorEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event dropped: no subscribers");
        }
    }

    /// A handle for sending commands. `None` once receiving has started.
    pub fn command_sender(&self) -> Option<mpsc::Sender<InspectorCommand>> {
        self.command_tx.clone()
    }

    /// Next command, or `None` when every handed-out sender is gone. The
    /// bus drops its own sender on the first call.
    pub async fn recv_command(&mut self) -> Option<InspectorCommand> {
        self.command_tx = None;
        self.command_rx.recv().await
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
