//! Photo ingestion and timeline commands.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use dermalens_api::models::{PhotoRecord, TimelineNode};
use dermalens_shared::types::{Photo, PhotoId};
use dermalens_shared::Timeline;

use crate::controller::Controller;
use crate::error::Result;
use crate::events::ToastVariant;
use crate::state::EditingPhoto;

/// Outcome summary for one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Photos staged onto the timeline.
    pub added: usize,
    /// Files skipped as duplicates.
    pub skipped: usize,
}

/// A file read and encoded, not yet checked against the timeline.
struct StagedFile {
    filename: String,
    size: u64,
    creation_date: NaiveDate,
    data_uri: String,
}

impl Controller {
    /// Host forwards dragenter/dragleave over the drop zone.
    pub fn set_dragover(&self, dragover: bool) -> Result<()> {
        self.state()?.dragover = dragover;
        Ok(())
    }

    /// Handle a drop: always clears the dragover highlight, and an empty
    /// file list never reaches file handling.
    pub async fn handle_drop(&self, files: Vec<PathBuf>) -> Result<IngestReport> {
        self.state()?.dragover = false;
        if files.is_empty() {
            return Ok(IngestReport::default());
        }
        self.handle_files(files).await
    }

    /// Stage picked, dropped, or pasted files onto the timeline, then
    /// schedule one analysis batch after the configured debounce delay.
    ///
    /// Duplicates (same filename and size as any timeline photo) are skipped
    /// with a toast. A file read failure aborts the rest of the batch,
    /// records a user-visible error, and schedules nothing; photos staged
    /// before the failure stay on the timeline.
    pub async fn handle_files(&self, files: Vec<PathBuf>) -> Result<IngestReport> {
        if files.is_empty() {
            return Ok(IngestReport::default());
        }

        // Wait out any in-flight session clear before staging.
        drop(self.clear_gate.lock().await);

        self.state()?.busy = true;

        let mut report = IngestReport::default();
        let mut failure: Option<String> = None;

        for path in &files {
            let staged = match read_file(path).await {
                Ok(staged) => staged,
                Err(message) => {
                    failure = Some(message);
                    break;
                }
            };

            let mut state = self.state()?;
            if state
                .timeline
                .contains_duplicate(&staged.filename, staged.size)
            {
                drop(state);
                warn!(filename = %staged.filename, "Duplicate upload skipped");
                self.events.toast(
                    "Upload Notice",
                    &format!("Skipped {} (already in timeline)", staged.filename),
                    ToastVariant::Warning,
                    "info-circle",
                );
                report.skipped += 1;
                continue;
            }

            let photo = Photo {
                id: PhotoId::new(),
                filename: staged.filename,
                size: staged.size,
                creation_date: staged.creation_date,
                uploaded_at: Utc::now(),
                local_content: staged.data_uri,
            };
            debug!(photo_id = %photo.id, filename = %photo.filename, "Photo staged");
            state.timeline.add_photo(photo);
            report.added += 1;
        }

        if let Some(message) = failure {
            error!(error = %message, "Local processing error");
            let mut state = self.state()?;
            state.error = Some(format!("Failed to process images: {message}"));
            state.busy = false;
            return Ok(report);
        }

        self.state()?.busy = false;
        info!(
            added = report.added,
            skipped = report.skipped,
            "Ingestion batch finished"
        );

        // Brief delay so the host renders the new cards before the batch
        // flips the busy flag back on.
        let controller = self.clone();
        let debounce = self.config.analysis_debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Err(e) = controller.analyze_all().await {
                error!(error = %e, "Scheduled analysis batch failed");
            }
        });

        Ok(report)
    }

    /// Delete a photo and its analysis, pruning an emptied date bucket.
    /// Returns whether anything was removed. The host owns any confirmation
    /// prompt.
    pub fn delete_photo(&self, photo_id: PhotoId) -> Result<bool> {
        let mut state = self.state()?;
        let removed = state.timeline.remove_photo(photo_id).is_some();
        if removed {
            state.analysis.remove(&photo_id);
            state.show_technical_details.remove(&photo_id);
            info!(photo_id = %photo_id, "Photo deleted locally");
        }
        Ok(removed)
    }

    /// Delete the photo currently open in the date-edit dialog and close it.
    pub fn delete_editing_photo(&self) -> Result<bool> {
        let photo_id = match self.state()?.editing {
            Some(ref editing) => editing.photo_id,
            None => return Ok(false),
        };
        let removed = self.delete_photo(photo_id)?;
        if removed {
            self.state()?.editing = None;
        }
        Ok(removed)
    }

    /// Open the date-edit dialog for a photo. Returns `false` if unknown.
    pub fn open_edit(&self, photo_id: PhotoId) -> Result<bool> {
        let mut state = self.state()?;
        let date = match state.timeline.find_photo(photo_id) {
            Some(photo) => photo.creation_date,
            None => return Ok(false),
        };
        state.editing = Some(EditingPhoto { photo_id, date });
        Ok(true)
    }

    /// Update the date shown in the edit dialog.
    pub fn set_editing_date(&self, date: NaiveDate) -> Result<()> {
        if let Some(editing) = self.state()?.editing.as_mut() {
            editing.date = date;
        }
        Ok(())
    }

    /// Apply the edited date: moves the photo between buckets (pruning an
    /// emptied source) and leaves its analysis untouched. Closes the dialog.
    pub fn save_date(&self) -> Result<()> {
        let mut state = self.state()?;
        if let Some(editing) = state.editing.take() {
            if state.timeline.change_date(editing.photo_id, editing.date) {
                info!(photo_id = %editing.photo_id, date = %editing.date, "Photo date updated");
            }
        }
        Ok(())
    }

    /// Replace the local timeline from the backend snapshot.
    ///
    /// Mixed node shapes (current `directory`, legacy loose `photo`) both
    /// normalize into date buckets. Analysis state is client-ephemeral and
    /// always starts empty after a snapshot load. Fetch failures are logged
    /// and leave the current timeline in place.
    pub async fn load_timeline(&self) -> Result<()> {
        let nodes = match self.api.timeline().await {
            Ok(nodes) => nodes,
            Err(e) => {
                error!(error = %e, "Timeline load failed");
                return Ok(());
            }
        };

        let mut timeline = Timeline::new();
        for node in nodes {
            match node {
                TimelineNode::Directory { items, .. } => {
                    for record in items {
                        timeline.add_photo(photo_from_record(record));
                    }
                }
                TimelineNode::Photo { data, .. } => {
                    timeline.add_photo(photo_from_record(data));
                }
            }
        }

        let mut state = self.state()?;
        info!(
            photos = timeline.len(),
            buckets = timeline.buckets().len(),
            "Timeline snapshot loaded"
        );
        state.timeline = timeline;
        state.analysis.clear();
        state.show_technical_details.clear();
        Ok(())
    }

    /// Wipe all local session state and notify the backend best-effort.
    ///
    /// The notification runs on a background task holding the clear gate, so
    /// an immediately following ingestion waits for it. Its failures are
    /// logged and never surfaced.
    pub async fn clear_session(&self) -> Result<()> {
        self.state()?.reset_for_clear();
        info!("Local session cleared");

        let gate = self.clear_gate.clone().lock_owned().await;
        let api = self.api.clone();
        tokio::spawn(async move {
            let _gate = gate;
            if let Err(e) = api.clear_session().await {
                error!(error = %e, "Session clear notification failed");
            }
        });
        Ok(())
    }
}

/// Read one file fully and encode it as a `data:` URI.
async fn read_file(path: &Path) -> std::result::Result<StagedFile, String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
    let creation_date = tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok())
        .map(|mtime| DateTime::<Utc>::from(mtime).date_naive())
        .unwrap_or_else(|| Utc::now().date_naive());
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_string();

    let data_uri = format!(
        "data:{};base64,{}",
        mime_for_extension(path),
        STANDARD.encode(&bytes)
    );
    Ok(StagedFile {
        filename,
        size: bytes.len() as u64,
        creation_date,
        data_uri,
    })
}

/// MIME type for the data URI, keyed off the file extension.
fn mime_for_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Normalize a wire photo into the local model. Unparseable ids get a fresh
/// uuid (ids only need to be unique locally); timestamps fall back through
/// the backend's `%Y-%m-%d %H:%M:%S` format to "now".
fn photo_from_record(record: PhotoRecord) -> Photo {
    Photo {
        id: Uuid::parse_str(&record.id)
            .map(PhotoId)
            .unwrap_or_else(|_| PhotoId::new()),
        filename: record.filename,
        size: record.size.unwrap_or(0),
        creation_date: record.creation_date,
        uploaded_at: parse_uploaded_at(&record.uploaded_at),
        local_content: record.local_content.unwrap_or_default(),
    }
}

fn parse_uploaded_at(raw: &str) -> DateTime<Utc> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Utc);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    Utc::now()
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
