//! Core data types for photos and analysis outcomes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique photo identifier, assigned once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoId(pub Uuid);

impl PhotoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A staged photo as the client tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub filename: String,
    /// File size in bytes, paired with `filename` for duplicate detection.
    pub size: u64,
    /// Calendar day the photo belongs to on the timeline.
    pub creation_date: NaiveDate,
    /// When the photo was staged locally; orders items within a day.
    pub uploaded_at: DateTime<Utc>,
    /// Full image content as a `data:` URI, sent with analyze requests.
    pub local_content: String,
}

/// One classifier label with its score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

/// Severity hint attached to interpretation fields.
///
/// Unrecognized wire values decode as [`InterpretationHint::Gray`] so a newer
/// backend never breaks rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpretationHint {
    Red,
    Yellow,
    Green,
    #[default]
    #[serde(other)]
    Gray,
}

/// Backend interpretation of a prediction set.
///
/// Every field defaults: older backend builds omit whole sections rather
/// than sending nulls, and a missing field must never fail a decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(default)]
    pub is_high_risk: bool,
    #[serde(default)]
    pub entropy: f64,
    #[serde(default)]
    pub is_reliable: bool,
    /// Human-readable verdict, e.g. `"Likely benign: Melanocytic Nevus"`.
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub color_hint: InterpretationHint,
    #[serde(default)]
    pub confidence_label: String,
    #[serde(default)]
    pub confidence_color: InterpretationHint,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub margin_threshold: Option<f64>,
    /// Step-by-step notes from the interpreter, shown in debug mode.
    #[serde(default)]
    pub computation_process: Vec<String>,
    #[serde(default)]
    pub top_2_labels: Vec<String>,
}

/// How the backend framed the lesion before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreprocessMode {
    Crop,
    Pad,
    None,
}

/// Preprocessing decision reported with an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessStrategy {
    pub strategy: PreprocessMode,
    #[serde(default)]
    pub reason: String,
    /// Detector bounding box as `[x1, y1, x2, y2]`, when a crop happened.
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub execution_time: Option<String>,
}

/// Per-stage wall-clock timings, e.g. `"image_preprocess" -> "0.004s"`.
pub type ExecutionTimes = BTreeMap<String, String>;

/// Client-held outcome of one successful analyze call.
///
/// The full prediction list appears under both `predictions` and `primary`:
/// older UI templates read `primary`, newer ones `predictions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub photo_id: PhotoId,
    /// When the record was created locally.
    pub date: DateTime<Utc>,
    /// Top prediction, always the first element of `predictions`.
    pub prediction: Prediction,
    pub predictions: Vec<Prediction>,
    pub primary: Vec<Prediction>,
    /// Raw first-pass classifier output, kept opaque for the debug panel.
    #[serde(default)]
    pub initial_classification: Option<serde_json::Value>,
    #[serde(default)]
    pub primary_name: Option<String>,
    #[serde(default)]
    pub interpretation: Option<Interpretation>,
    #[serde(default)]
    pub preprocess_strategy: Option<PreprocessStrategy>,
    #[serde(default)]
    pub prepared_image_base64: Option<String>,
    #[serde(default)]
    pub execution_times: Option<ExecutionTimes>,
    /// Saliency overlay, cached lazily on first request.
    #[serde(default)]
    pub saliency_base64: Option<String>,
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_decodes_known_values() {
        let hint: InterpretationHint = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(hint, InterpretationHint::Red);
        let hint: InterpretationHint = serde_json::from_str("\"green\"").unwrap();
        assert_eq!(hint, InterpretationHint::Green);
    }

    #[test]
    fn test_hint_falls_back_to_gray_on_unknown() {
        let hint: InterpretationHint = serde_json::from_str("\"magenta\"").unwrap();
        assert_eq!(hint, InterpretationHint::Gray);
    }

    #[test]
    fn test_hint_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&InterpretationHint::Yellow).unwrap(),
            "\"yellow\""
        );
    }

    #[test]
    fn test_interpretation_decodes_sparse_shape() {
        // The backend's placeholder result omits the margin fields entirely.
        let raw = r#"{
            "is_high_risk": false,
            "entropy": 0.0,
            "is_reliable": false,
            "annotation": "Analysis Pending",
            "color_hint": "gray",
            "confidence_label": "Unknown",
            "confidence_color": "gray",
            "computation_process": []
        }"#;
        let interp: Interpretation = serde_json::from_str(raw).unwrap();
        assert_eq!(interp.annotation, "Analysis Pending");
        assert_eq!(interp.color_hint, InterpretationHint::Gray);
        assert_eq!(interp.status, None);
        assert_eq!(interp.margin, None);
        assert!(interp.top_2_labels.is_empty());
    }

    #[test]
    fn test_preprocess_strategy_decodes_with_bbox() {
        let raw = r#"{
            "strategy": "crop",
            "reason": "lesion at 0.42 of frame",
            "bbox": [10.0, 20.0, 110.0, 140.0],
            "execution_time": "0.031s"
        }"#;
        let strategy: PreprocessStrategy = serde_json::from_str(raw).unwrap();
        assert_eq!(strategy.strategy, PreprocessMode::Crop);
        assert_eq!(strategy.bbox, Some([10.0, 20.0, 110.0, 140.0]));
    }

    #[test]
    fn test_photo_id_display_matches_uuid() {
        let id = PhotoId::new();
        assert_eq!(id.to_string(), id.0.to_string());
    }
}
