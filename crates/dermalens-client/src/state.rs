//! Controller state shared across all command handlers.
//!
//! The [`ControllerState`] struct is wrapped in `Arc<Mutex<>>` by the
//! [`Controller`](crate::Controller) so every command can read and mutate it
//! between suspension points. It is `Clone + Serialize` so hosts can snapshot
//! the whole thing and feed it to their rendering layer.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use dermalens_shared::constants::DEFAULT_MARGIN_THRESHOLD;
use dermalens_shared::types::{AnalysisRecord, PhotoId};
use dermalens_shared::Timeline;

/// Target of the date-edit dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditingPhoto {
    pub photo_id: PhotoId,
    /// Date currently shown in the dialog's date field.
    pub date: NaiveDate,
}

/// Central controller state: everything the UI binds.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerState {
    /// Date-bucketed photo timeline, newest day first.
    pub timeline: Timeline,

    /// Per-photo analysis outcomes. Absence means "not analyzed yet";
    /// this map never survives a snapshot reload or a session clear.
    pub analysis: HashMap<PhotoId, AnalysisRecord>,

    /// Per-photo "show technical details" panel flags.
    pub show_technical_details: HashMap<PhotoId, bool>,

    /// Accumulating human-readable analysis report. Doubles as the
    /// session's audit trail.
    pub response_log: String,

    /// Wall-clock duration of the last analysis batch, whole milliseconds.
    pub latency_ms: Option<u64>,

    /// True while an ingestion or analysis batch is running.
    pub busy: bool,

    /// Last user-visible error message, if any.
    pub error: Option<String>,

    /// True while a drag hovers the drop zone.
    pub dragover: bool,

    /// Date-edit dialog target, when the dialog is open.
    pub editing: Option<EditingPhoto>,

    /// Backend model status label shown in the header.
    pub model_name: String,

    /// Whether the backend reports its lesion detector as loaded.
    pub yolo_available: bool,

    /// Margin threshold forwarded with analyze requests (UI-adjustable).
    pub margin_threshold: f64,

    /// Photo currently being analyzed, if any. At most one at a time.
    pub current_analysis_id: Option<PhotoId>,

    /// Debug display mode, mirrored into the page URL.
    pub debug_mode: bool,

    /// Opaque backend correlation id read from the session cookie.
    pub session_id: Option<String>,
}

impl ControllerState {
    /// Create a fresh, empty state.
    pub fn new() -> Self {
        Self {
            timeline: Timeline::new(),
            analysis: HashMap::new(),
            show_technical_details: HashMap::new(),
            response_log: String::new(),
            latency_ms: None,
            busy: false,
            error: None,
            dragover: false,
            editing: None,
            model_name: "Loading...".to_string(),
            yolo_available: false,
            margin_threshold: DEFAULT_MARGIN_THRESHOLD,
            current_analysis_id: None,
            debug_mode: false,
            session_id: None,
        }
    }

    /// Reset everything a session clear wipes. Connection-level fields
    /// (model status, margin threshold, session id, debug mode) survive.
    pub fn reset_for_clear(&mut self) {
        self.timeline.clear();
        self.analysis.clear();
        self.show_technical_details.clear();
        self.response_log.clear();
        self.latency_ms = None;
        self.busy = false;
        self.current_analysis_id = None;
        self.editing = None;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}
