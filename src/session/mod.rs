pub mod capture;
pub mod events;
pub mod history;
pub mod inspector;

pub use capture::{Capture, CaptureSource, FileCapture, Snapshot};
pub use events::{EventBus, InspectorCommand, InspectorEvent};
pub use history::{History, HistoryEntry, HistoryStore, JsonHistoryStore};
pub use inspector::{Inspector, PointerOutcome};
