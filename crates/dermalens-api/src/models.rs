//! Wire types for the backend photo-analysis API.
//!
//! Request shapes mirror the backend contract field for field. Response
//! shapes default aggressively: the backend omits sections it did not
//! compute, and a missing section must never fail a decode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dermalens_shared::types::{ExecutionTimes, Interpretation, Prediction, PreprocessStrategy};

/// `GET /api/health` response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// `"OK"`, `"suspended"`, or whatever a future backend reports.
    pub status: String,
    /// Whether the lesion detector model loaded.
    #[serde(default)]
    pub yolo_available: bool,
}

/// A photo as the backend serializes it in timeline snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub filename: String,
    pub creation_date: NaiveDate,
    /// Free-form timestamp; the backend emits `%Y-%m-%d %H:%M:%S`.
    pub uploaded_at: String,
    /// Server-side analysis cache; decoded but never restored locally,
    /// analysis state is client-ephemeral.
    #[serde(default)]
    pub analysis: Option<serde_json::Value>,
    #[serde(default)]
    pub analysis_date: Option<String>,
    #[serde(default)]
    pub local_content: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// One node of the timeline snapshot. Current backends emit date-grouped
/// `directory` nodes; old sessions may still contain loose `photo` nodes,
/// so both shapes decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineNode {
    Directory {
        date: NaiveDate,
        #[serde(default)]
        items: Vec<PhotoRecord>,
    },
    Photo {
        date: NaiveDate,
        data: PhotoRecord,
    },
}

/// `POST /api/photos/{id}/analyze` request body.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub model: String,
    pub margin_threshold: f64,
    /// Full image as a `data:` URI. Omitted when the client holds no local
    /// content; the backend then falls back to its own copy of the photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64_image: Option<String>,
}

/// `POST /api/photos/{id}/analyze` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub photo_id: Option<String>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub initial_classification: Option<serde_json::Value>,
    #[serde(default)]
    pub primary_model_name: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<String>,
    #[serde(default)]
    pub prepared_image_base64: Option<String>,
    #[serde(default)]
    pub saliency_base64: Option<String>,
    #[serde(default)]
    pub interpretation: Option<Interpretation>,
    #[serde(default)]
    pub preprocess_strategy: Option<PreprocessStrategy>,
    #[serde(default)]
    pub execution_times: Option<ExecutionTimes>,
}

/// `POST /api/photos/{id}/saliency` request body.
#[derive(Debug, Clone, Serialize)]
pub struct SaliencyRequest {
    pub base64_image: String,
    /// Label whose activation map the backend should render.
    pub target_label: String,
}

/// `POST /api/photos/{id}/saliency` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SaliencyResponse {
    #[serde(default)]
    pub photo_id: Option<String>,
    pub saliency_base64: String,
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use dermalens_shared::types::{InterpretationHint, PreprocessMode};

    use super::*;

    #[test]
    fn test_timeline_decodes_mixed_node_shapes() {
        let raw = r#"[
            {
                "type": "directory",
                "date": "2024-01-02",
                "data": null,
                "items": [
                    {
                        "id": "f7b7f8f0-0000-0000-0000-000000000001",
                        "filename": "arm.jpg",
                        "creation_date": "2024-01-02",
                        "uploaded_at": "2024-01-02 09:15:00"
                    }
                ]
            },
            {
                "type": "photo",
                "date": "2024-01-01",
                "data": {
                    "id": "f7b7f8f0-0000-0000-0000-000000000002",
                    "filename": "leg.jpg",
                    "creation_date": "2024-01-01",
                    "uploaded_at": "2024-01-01 18:00:00",
                    "analysis": {"legacy": true}
                }
            }
        ]"#;
        let nodes: Vec<TimelineNode> = serde_json::from_str(raw).unwrap();
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            TimelineNode::Directory { date, items } => {
                assert_eq!(*date, "2024-01-02".parse().unwrap());
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].filename, "arm.jpg");
            }
            other => panic!("expected directory node, got {other:?}"),
        }
        match &nodes[1] {
            TimelineNode::Photo { data, .. } => {
                assert_eq!(data.filename, "leg.jpg");
                assert!(data.analysis.is_some());
            }
            other => panic!("expected photo node, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_response_decodes_full_shape() {
        let raw = r#"{
            "photo_id": "abc",
            "predictions": [
                {"label": "Melanocytic Nevus", "score": 0.82},
                {"label": "Melanoma", "score": 0.12}
            ],
            "primary_model_name": "medsiglip-448",
            "analysis_date": "2024-01-02 10:00:00",
            "prepared_image_base64": "cHJlcGFyZWQ=",
            "interpretation": {
                "is_high_risk": false,
                "entropy": 0.61,
                "is_reliable": true,
                "annotation": "Likely benign: Melanocytic Nevus",
                "color_hint": "green",
                "confidence_label": "Confident",
                "confidence_color": "green",
                "status": "likely_benign",
                "margin": 0.7,
                "margin_threshold": 0.05,
                "computation_process": ["margin 0.70 >= threshold 0.05"],
                "top_2_labels": ["Melanocytic Nevus", "Melanoma"]
            },
            "preprocess_strategy": {"strategy": "pad", "reason": "image below model input size"},
            "execution_times": {"image_preprocess": "0.004s", "primary_medsiglip": "0.120s"}
        }"#;
        let resp: AnalyzeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.predictions.len(), 2);
        assert_eq!(resp.predictions[0].label, "Melanocytic Nevus");
        let interp = resp.interpretation.unwrap();
        assert_eq!(interp.color_hint, InterpretationHint::Green);
        assert_eq!(interp.margin, Some(0.7));
        let strategy = resp.preprocess_strategy.unwrap();
        assert_eq!(strategy.strategy, PreprocessMode::Pad);
        let times = resp.execution_times.unwrap();
        assert_eq!(times.get("image_preprocess").map(String::as_str), Some("0.004s"));
    }

    #[test]
    fn test_analyze_response_tolerates_bare_shape() {
        let resp: AnalyzeResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.predictions.is_empty());
        assert!(resp.interpretation.is_none());
        assert!(resp.execution_times.is_none());
    }

    #[test]
    fn test_analyze_request_omits_absent_image() {
        let with_image = AnalyzeRequest {
            model: "medsiglip".to_string(),
            margin_threshold: 0.05,
            base64_image: Some("data:image/png;base64,AAAA".to_string()),
        };
        let json = serde_json::to_value(&with_image).unwrap();
        assert!(json.get("base64_image").is_some());

        let without_image = AnalyzeRequest {
            model: "medsiglip".to_string(),
            margin_threshold: 0.05,
            base64_image: None,
        };
        let json = serde_json::to_value(&without_image).unwrap();
        assert!(json.get("base64_image").is_none());
    }
}
