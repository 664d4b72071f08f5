//! Session bootstrap and environment commands.

use tracing::{error, info};
use url::Url;

use dermalens_api::ApiError;
use dermalens_shared::constants::{DEBUG_QUERY_PARAM, SESSION_COOKIE};

use crate::controller::Controller;
use crate::error::Result;

/// Bootstrap inputs read once from the hosting page.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Raw cookie string (`document.cookie` shape), if the host has one.
    pub cookie_header: Option<String>,
    /// Full page URL, used to detect the debug query parameter.
    pub page_url: Option<String>,
}

impl Controller {
    /// Bootstrap the controller: read the session cookie, detect debug mode,
    /// then load the timeline snapshot and the model status in that order.
    pub async fn init(&self, options: InitOptions) -> Result<()> {
        let session_id = options
            .cookie_header
            .as_deref()
            .and_then(|header| cookie_value(header, SESSION_COOKIE));
        let debug_mode = options
            .page_url
            .as_deref()
            .map(url_has_debug_param)
            .unwrap_or(false);

        info!(
            has_session = session_id.is_some(),
            debug_mode, "Initializing session"
        );
        {
            let mut state = self.state()?;
            state.session_id = session_id.clone();
            state.debug_mode = debug_mode;
        }
        self.api.set_session(session_id);

        self.load_timeline().await?;
        self.fetch_model_info().await?;
        Ok(())
    }

    /// Refresh the backend health and model status label.
    ///
    /// An error status from the endpoint only logs and leaves the current
    /// label in place; a transport fault swaps it for an error label.
    pub async fn fetch_model_info(&self) -> Result<()> {
        match self.api.health().await {
            Ok(health) => {
                let mut state = self.state()?;
                state.yolo_available = health.yolo_available;
                state.model_name = model_label(&health.status);
                info!(
                    status = %health.status,
                    yolo_available = health.yolo_available,
                    "Model info refreshed"
                );
            }
            Err(ApiError::Status { status, .. }) => {
                error!(status, "Health endpoint returned an error status");
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch model info");
                self.state()?.model_name = "Error fetching health".to_string();
            }
        }
        Ok(())
    }

    /// Toggle debug display mode and return the page URL with the query
    /// parameter updated. The host applies it without reloading.
    pub fn toggle_debug(&self, current_url: &str) -> Result<String> {
        let debug_mode = {
            let mut state = self.state()?;
            state.debug_mode = !state.debug_mode;
            state.debug_mode
        };

        let mut url = Url::parse(current_url)?;
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != DEBUG_QUERY_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &retained {
                pairs.append_pair(key, value);
            }
            if debug_mode {
                pairs.append_pair(DEBUG_QUERY_PARAM, "1");
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        info!(debug_mode, "Debug mode toggled");
        Ok(url.to_string())
    }
}

/// Extract one cookie from a raw `document.cookie`-style string.
pub(crate) fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn url_has_debug_param(page_url: &str) -> bool {
    Url::parse(page_url)
        .map(|url| url.query_pairs().any(|(key, _)| key == DEBUG_QUERY_PARAM))
        .unwrap_or(false)
}

/// Map the backend health status to the displayed model label.
pub(crate) fn model_label(status: &str) -> String {
    match status {
        "OK" => "MedSigLIP (Local)".to_string(),
        "suspended" => "Service Suspended".to_string(),
        "" => "Unknown Status".to_string(),
        other => other.to_string(),
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
