//! Analysis orchestration: the sequential batch loop and the saliency fetch.

use std::time::Instant;

use chrono::{Local, Utc};
use tracing::{debug, error, info, warn};

use dermalens_api::models::{AnalyzeRequest, AnalyzeResponse, SaliencyRequest};
use dermalens_api::ApiError;
use dermalens_shared::types::{AnalysisRecord, PhotoId};

use crate::controller::Controller;
use crate::error::Result;

/// Per-photo inputs captured up front so no state lock is ever held across
/// a network await.
struct Candidate {
    photo_id: PhotoId,
    filename: String,
    local_content: String,
}

impl Controller {
    /// Analyze every photo that has no analysis yet, strictly one at a time
    /// in timeline order.
    ///
    /// Failures are isolated per photo: a non-success response or transport
    /// fault becomes a line in the report log and the loop moves on. The
    /// busy flag is reset on every path out.
    pub async fn analyze_all(&self) -> Result<()> {
        {
            let mut state = self.state()?;
            state.busy = true;
            state.error = None;
            state.latency_ms = Some(0);
        }

        let result = self.run_batch().await;
        if let Ok(mut state) = self.state.lock() {
            state.busy = false;
        }
        result
    }

    async fn run_batch(&self) -> Result<()> {
        let candidates: Vec<Candidate> = {
            let state = self.state()?;
            state
                .timeline
                .photos()
                .filter(|photo| !state.analysis.contains_key(&photo.id))
                .map(|photo| Candidate {
                    photo_id: photo.id,
                    filename: photo.filename.clone(),
                    local_content: photo.local_content.clone(),
                })
                .collect()
        };

        if candidates.is_empty() {
            debug!("No photos awaiting analysis");
            return Ok(());
        }

        let total = candidates.len();
        info!(photos = total, "Starting analysis batch");
        {
            let mut state = self.state()?;
            if !state.response_log.is_empty() {
                state.response_log.push_str("\n\n");
            }
            let started = Local::now().format("%H:%M:%S");
            state
                .response_log
                .push_str(&format!("--- Starting Local Analysis Batch [{started}] ---\n"));
        }

        let batch_start = Instant::now();
        for candidate in candidates {
            self.analyze_one(candidate).await?;
        }

        let elapsed_ms = batch_start.elapsed().as_millis() as u64;
        {
            let mut state = self.state()?;
            state.latency_ms = Some(elapsed_ms);
            state.response_log.push_str("Batch Completion Success.");
        }
        info!(photos = total, elapsed_ms, "Analysis batch finished");
        Ok(())
    }

    /// Run one photo through the backend and fold the outcome into state.
    ///
    /// The margin threshold is read fresh per photo, so a slider change made
    /// mid-batch applies to the remaining requests.
    async fn analyze_one(&self, candidate: Candidate) -> Result<()> {
        info!(
            photo_id = %candidate.photo_id,
            filename = %candidate.filename,
            "Analyzing photo"
        );
        let margin_threshold = {
            let mut state = self.state()?;
            state
                .response_log
                .push_str(&format!("Analyzing {} (Local Transfer)...\n", candidate.filename));
            state.current_analysis_id = Some(candidate.photo_id);
            state.margin_threshold
        };

        let request = AnalyzeRequest {
            model: self.config.model.clone(),
            margin_threshold,
            base64_image: (!candidate.local_content.is_empty())
                .then(|| candidate.local_content.clone()),
        };
        let outcome = self.api.analyze(candidate.photo_id, &request).await;

        let mut state = self.state()?;
        match outcome {
            Ok(response) if !response.predictions.is_empty() => {
                let model_name = response.primary_model_name.clone().unwrap_or_default();
                state
                    .response_log
                    .push_str(&format!("  ➔ Primary Results ({model_name}):\n"));
                for prediction in &response.predictions {
                    state.response_log.push_str(&format!(
                        "     - {}: {:.1}%\n",
                        prediction.label,
                        prediction.score * 100.0
                    ));
                }
                if let Some(record) = record_from_response(candidate.photo_id, response) {
                    state.analysis.insert(candidate.photo_id, record);
                }
            }
            Ok(_) => {
                warn!(photo_id = %candidate.photo_id, "Analyze response carried no predictions");
            }
            Err(ApiError::Status { status, body }) => {
                error!(photo_id = %candidate.photo_id, status, "Analysis rejected");
                state
                    .response_log
                    .push_str(&format!("  ➔ Request Failed: {status} {body}\n"));
            }
            Err(e) => {
                error!(photo_id = %candidate.photo_id, error = %e, "Analysis error");
                state.response_log.push_str(&format!("  ➔ Error: {e}\n"));
            }
        }
        state.current_analysis_id = None;
        state.response_log.push('\n');
        Ok(())
    }

    /// Fetch the saliency overlay for an analyzed photo, lazily and at most
    /// once. No-ops when there is no analysis record, the overlay is already
    /// cached, or the photo left the timeline. Failures are logged and never
    /// reach the report log.
    pub async fn fetch_saliency(&self, photo_id: PhotoId) -> Result<()> {
        let request = {
            let state = self.state()?;
            let Some(record) = state.analysis.get(&photo_id) else {
                warn!(photo_id = %photo_id, "No analysis record for saliency request");
                return Ok(());
            };
            if record.saliency_base64.is_some() {
                debug!(photo_id = %photo_id, "Saliency already cached");
                return Ok(());
            }
            let Some(top) = record.primary.first() else {
                warn!(photo_id = %photo_id, "No primary prediction to target");
                return Ok(());
            };
            let Some(photo) = state.timeline.find_photo(photo_id) else {
                warn!(photo_id = %photo_id, "Photo no longer on the timeline");
                return Ok(());
            };
            SaliencyRequest {
                base64_image: photo.local_content.clone(),
                target_label: top.label.clone(),
            }
        };

        match self.api.saliency(photo_id, &request).await {
            Ok(response) => {
                let mut state = self.state()?;
                if let Some(record) = state.analysis.get_mut(&photo_id) {
                    info!(
                        photo_id = %photo_id,
                        bytes = response.saliency_base64.len(),
                        "Saliency overlay cached"
                    );
                    record.saliency_base64 = Some(response.saliency_base64);
                }
            }
            Err(e) => {
                error!(photo_id = %photo_id, error = %e, "Saliency fetch failed");
            }
        }
        Ok(())
    }
}

/// Build the client-held record from a successful analyze response. Returns
/// `None` when the response carries no predictions.
fn record_from_response(photo_id: PhotoId, response: AnalyzeResponse) -> Option<AnalysisRecord> {
    let top = response.predictions.first()?.clone();
    Some(AnalysisRecord {
        photo_id,
        date: Utc::now(),
        prediction: top,
        predictions: response.predictions.clone(),
        primary: response.predictions,
        initial_classification: response.initial_classification,
        primary_name: response.primary_model_name,
        interpretation: response.interpretation,
        preprocess_strategy: response.preprocess_strategy,
        prepared_image_base64: response.prepared_image_base64,
        execution_times: response.execution_times,
        saliency_base64: response.saliency_base64,
    })
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
