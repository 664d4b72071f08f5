//! Test fixtures: a mock backend over loopback, a recording clipboard, and
//! controller builders shared by the command tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;

use dermalens_shared::types::{AnalysisRecord, Photo, PhotoId, Prediction};

use crate::clipboard::{Clipboard, ClipboardError};
use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::events::{ToastPayload, UiEvent};

/// Knobs and counters for the in-process mock backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Path ids of analyze calls, in arrival order.
    pub analyze_ids: Arc<Mutex<Vec<String>>>,
    /// Raw analyze request bodies, in arrival order.
    pub analyze_bodies: Arc<Mutex<Vec<serde_json::Value>>>,
    /// Ids that should fail analysis with HTTP 500.
    pub failing_ids: Arc<Mutex<Vec<String>>>,
    /// Number of saliency calls served.
    pub saliency_calls: Arc<Mutex<usize>>,
    /// When set, saliency calls fail with HTTP 500.
    pub saliency_fails: Arc<Mutex<bool>>,
    /// Number of session clear (DELETE) calls served.
    pub clear_calls: Arc<Mutex<usize>>,
    /// Timeline snapshot served by `GET /api/photos`; `null` means `[]`.
    pub timeline_json: Arc<Mutex<serde_json::Value>>,
    /// Milliseconds each analyze call stalls after being recorded.
    pub analyze_delay_ms: Arc<Mutex<u64>>,
    /// Milliseconds the session clear stalls before counting and replying.
    pub clear_delay_ms: Arc<Mutex<u64>>,
}

/// A ready-to-use controller wired against its own mock backend.
pub struct TestContext {
    pub controller: Controller,
    pub events: UnboundedReceiver<UiEvent>,
    pub mock: MockBackend,
}

pub async fn controller_with_backend() -> TestContext {
    let mock = MockBackend::default();
    let addr = spawn_backend(mock.clone()).await;
    let config = ClientConfig {
        api_base_url: format!("http://{addr}"),
        analysis_debounce: Duration::from_millis(10),
        ..ClientConfig::default()
    };
    let (controller, events) = Controller::new(config);
    TestContext {
        controller,
        events,
        mock,
    }
}

pub async fn spawn_backend(mock: MockBackend) -> SocketAddr {
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/photos", get(timeline).delete(clear))
        .route("/api/photos/:id/analyze", post(analyze))
        .route("/api/photos/:id/saliency", post(saliency))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "OK", "yolo_available": true}))
}

async fn timeline(State(mock): State<MockBackend>) -> Json<serde_json::Value> {
    let value = mock.timeline_json.lock().unwrap().clone();
    if value.is_null() {
        Json(serde_json::json!([]))
    } else {
        Json(value)
    }
}

async fn clear(State(mock): State<MockBackend>) -> Json<serde_json::Value> {
    let delay = *mock.clear_delay_ms.lock().unwrap();
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    *mock.clear_calls.lock().unwrap() += 1;
    Json(serde_json::json!({"status": "cleared"}))
}

async fn analyze(
    State(mock): State<MockBackend>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    mock.analyze_ids.lock().unwrap().push(id.clone());
    mock.analyze_bodies.lock().unwrap().push(body);
    let delay = *mock.analyze_delay_ms.lock().unwrap();
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if mock.failing_ids.lock().unwrap().contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model exploded").into_response();
    }
    Json(serde_json::json!({
        "photo_id": id,
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
    }))
    .into_response()
}

async fn saliency(State(mock): State<MockBackend>, Path(id): Path<String>) -> Response {
    *mock.saliency_calls.lock().unwrap() += 1;
    if *mock.saliency_fails.lock().unwrap() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "saliency exploded").into_response();
    }
    Json(serde_json::json!({"photo_id": id, "saliency_base64": "c2FsaWVuY3k="})).into_response()
}

/// Clipboard that records writes for assertions.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub writes: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if *self.fail.lock().unwrap() {
            return Err(ClipboardError::Write("denied".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Photo fixture with deterministic content and today-independent dates.
pub fn test_photo(name: &str, date: &str) -> Photo {
    Photo {
        id: PhotoId::new(),
        filename: name.to_string(),
        size: 1024,
        creation_date: date.parse().unwrap(),
        uploaded_at: Utc::now(),
        local_content: "data:image/png;base64,QUFBQQ==".to_string(),
    }
}

/// Analysis record fixture matching the mock backend's canned response.
pub fn test_record(photo_id: PhotoId) -> AnalysisRecord {
    let predictions = vec![
        Prediction {
            label: "Melanocytic Nevus".to_string(),
            score: 0.82,
        },
        Prediction {
            label: "Melanoma".to_string(),
            score: 0.12,
        },
    ];
    AnalysisRecord {
        photo_id,
        date: Utc::now(),
        prediction: predictions[0].clone(),
        predictions: predictions.clone(),
        primary: predictions,
        initial_classification: None,
        primary_name: Some("medsiglip-448".to_string()),
        interpretation: None,
        preprocess_strategy: None,
        prepared_image_base64: None,
        execution_times: None,
        saliency_base64: None,
    }
}

/// Drain all pending events into the subset of toast payloads.
pub fn drain_toasts(rx: &mut UnboundedReceiver<UiEvent>) -> Vec<ToastPayload> {
    let mut toasts = Vec::new();
    while let Ok(event) = rx.try_recv() {
        match event {
            UiEvent::Toast(payload) => toasts.push(payload),
        }
    }
    toasts
}

/// Poll `condition` every 10ms until it holds or `timeout_ms` elapses.
pub async fn wait_until(mut condition: impl FnMut() -> bool, timeout_ms: u64) -> bool {
    let deadline = std::time::Instant::now() + Duration::from_millis(timeout_ms);
    while std::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
