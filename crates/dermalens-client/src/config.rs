//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so a host can embed the controller
//! with zero configuration against a local backend.

use std::time::Duration;

use dermalens_shared::constants::{ANALYSIS_DEBOUNCE_MS, ANALYSIS_MODEL, DEFAULT_MARGIN_THRESHOLD};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the inference backend.
    /// Env: `DERMALENS_API_URL`
    /// Default: `http://127.0.0.1:8000`
    pub api_base_url: String,

    /// Model selector sent with every analyze request.
    /// Env: `DERMALENS_MODEL`
    /// Default: `medsiglip`
    pub model: String,

    /// Initial margin threshold forwarded to the backend interpreter.
    /// The UI can adjust it at runtime.
    /// Env: `DERMALENS_MARGIN_THRESHOLD` (0.0 to 1.0)
    /// Default: `0.05`
    pub margin_threshold: f64,

    /// Delay between staging ingested photos and starting the analysis
    /// batch, giving the UI a beat to render the new cards first.
    /// Env: `DERMALENS_ANALYSIS_DEBOUNCE_MS`
    /// Default: `300`
    pub analysis_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            model: ANALYSIS_MODEL.to_string(),
            margin_threshold: DEFAULT_MARGIN_THRESHOLD,
            analysis_debounce: Duration::from_millis(ANALYSIS_DEBOUNCE_MS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("DERMALENS_API_URL") {
            if !url.is_empty() {
                config.api_base_url = url;
            }
        }

        if let Ok(model) = std::env::var("DERMALENS_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }

        if let Ok(val) = std::env::var("DERMALENS_MARGIN_THRESHOLD") {
            match val.parse::<f64>() {
                Ok(t) if (0.0..=1.0).contains(&t) => config.margin_threshold = t,
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid DERMALENS_MARGIN_THRESHOLD, using default"
                    );
                }
            }
        }

        if let Ok(val) = std::env::var("DERMALENS_ANALYSIS_DEBOUNCE_MS") {
            match val.parse::<u64>() {
                Ok(ms) => config.analysis_debounce = Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(
                        value = %val,
                        "Invalid DERMALENS_ANALYSIS_DEBOUNCE_MS, using default"
                    );
                }
            }
        }

        config
    }
}
