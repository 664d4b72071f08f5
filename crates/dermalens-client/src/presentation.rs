//! Display lookups and the clinical report export.
//!
//! The lookup tables map interpretation hints onto the host's design tokens
//! (CSS variables, badge variants, icon names). They are plain functions so
//! template code can call them without touching controller state.

use tracing::{debug, info};

use dermalens_shared::types::{AnalysisRecord, InterpretationHint, PhotoId};

use crate::controller::Controller;
use crate::error::Result;
use crate::events::ToastVariant;

/// CSS color token for an interpretation hint.
pub fn interpretation_color(hint: InterpretationHint) -> &'static str {
    match hint {
        InterpretationHint::Red => "var(--sl-color-danger-600)",
        InterpretationHint::Yellow => "var(--sl-color-warning-600)",
        InterpretationHint::Green => "var(--sl-color-success-600)",
        InterpretationHint::Gray => "var(--sl-color-neutral-600)",
    }
}

/// Severity badge category for an interpretation hint.
pub fn badge_variant(hint: InterpretationHint) -> &'static str {
    match hint {
        InterpretationHint::Red => "danger",
        InterpretationHint::Yellow => "warning",
        InterpretationHint::Green => "success",
        InterpretationHint::Gray => "neutral",
    }
}

/// Icon name for an interpretation hint.
pub fn interpretation_icon(hint: InterpretationHint) -> &'static str {
    match hint {
        InterpretationHint::Green => "shield-check",
        InterpretationHint::Red => "exclamation-triangle",
        InterpretationHint::Yellow | InterpretationHint::Gray => "activity",
    }
}

/// Render one analysis record as the fixed clinical-summary text block.
pub fn format_clinical_summary(record: &AnalysisRecord) -> String {
    let annotation = record
        .interpretation
        .as_ref()
        .map(|interp| interp.annotation.as_str())
        .unwrap_or(record.prediction.label.as_str());
    let confidence = record
        .interpretation
        .as_ref()
        .map(|interp| interp.confidence_label.as_str())
        .unwrap_or("N/A");
    let score = format!("{}%", (record.prediction.score * 100.0).round() as i64);
    let date = record
        .date
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S");

    format!(
        "Clinical Summary\n\
         ----------------\n\
         Result: {annotation}\n\
         Confidence: {confidence} ({score})\n\
         Date: {date}\n\
         \n\
         Note: This is an AI-assisted analysis and should be reviewed by a professional."
    )
}

impl Controller {
    /// Copy the clinical summary for a photo to the host clipboard.
    ///
    /// A successful write surfaces a confirmation toast; a clipboard failure
    /// is silent apart from a debug log. Returns whether text was copied.
    pub fn copy_report(&self, photo_id: PhotoId) -> Result<bool> {
        let text = {
            let state = self.state()?;
            let Some(record) = state.analysis.get(&photo_id) else {
                return Ok(false);
            };
            format_clinical_summary(record)
        };

        match self.clipboard.write_text(&text) {
            Ok(()) => {
                info!(photo_id = %photo_id, "Clinical summary copied");
                self.events.toast(
                    "Copied",
                    "Clinical summary copied to clipboard",
                    ToastVariant::Success,
                    "clipboard-check",
                );
                Ok(true)
            }
            Err(e) => {
                debug!(photo_id = %photo_id, error = %e, "Clipboard write failed");
                Ok(false)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
