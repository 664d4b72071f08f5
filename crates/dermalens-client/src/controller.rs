//! The controller object that hosts embed.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::UnboundedReceiver;

use dermalens_api::ApiClient;
use dermalens_shared::types::PhotoId;

use crate::clipboard::{Clipboard, NullClipboard};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::{EventSender, UiEvent};
use crate::state::ControllerState;

/// Stateful controller for the photo-analysis UI. One instance per session.
///
/// Cloning is cheap and shares all state, so scheduled work (the debounced
/// analysis batch, the best-effort session clear) runs on background tasks
/// against the same controller.
#[derive(Clone)]
pub struct Controller {
    pub(crate) config: ClientConfig,
    pub(crate) api: ApiClient,
    pub(crate) state: Arc<Mutex<ControllerState>>,
    pub(crate) events: EventSender,
    pub(crate) clipboard: Arc<dyn Clipboard>,
    /// Held while a session clear notifies the backend; ingestion waits on
    /// it so new photos never race the server-side wipe.
    pub(crate) clear_gate: Arc<tokio::sync::Mutex<()>>,
}

impl Controller {
    /// Build a controller and the host's event receiver, with no clipboard.
    pub fn new(config: ClientConfig) -> (Self, UnboundedReceiver<UiEvent>) {
        Self::with_clipboard(config, Arc::new(NullClipboard))
    }

    /// Build a controller with a host-provided clipboard.
    pub fn with_clipboard(
        config: ClientConfig,
        clipboard: Arc<dyn Clipboard>,
    ) -> (Self, UnboundedReceiver<UiEvent>) {
        let (events, rx) = EventSender::channel();
        let api = ApiClient::new(config.api_base_url.clone());
        let mut state = ControllerState::new();
        state.margin_threshold = config.margin_threshold;

        let controller = Self {
            config,
            api,
            state: Arc::new(Mutex::new(state)),
            events,
            clipboard,
            clear_gate: Arc::new(tokio::sync::Mutex::new(())),
        };
        (controller, rx)
    }

    /// Lock the state. A poisoned lock maps to [`ClientError::LockPoisoned`].
    pub(crate) fn state(&self) -> Result<MutexGuard<'_, ControllerState>> {
        self.state.lock().map_err(|_| ClientError::LockPoisoned)
    }

    /// Clone of the full state for host-side rendering.
    pub fn snapshot(&self) -> Result<ControllerState> {
        Ok(self.state()?.clone())
    }

    /// True when leaving the page would discard staged photos. Drives the
    /// host's unload confirmation prompt.
    pub fn should_confirm_leave(&self) -> bool {
        self.state
            .lock()
            .map(|state| !state.timeline.is_empty())
            .unwrap_or(false)
    }

    /// UI slider binding for the analyze margin threshold.
    pub fn set_margin_threshold(&self, threshold: f64) -> Result<()> {
        self.state()?.margin_threshold = threshold;
        Ok(())
    }

    /// Flip a photo's technical-details panel; returns the new value.
    pub fn toggle_technical_details(&self, photo_id: PhotoId) -> Result<bool> {
        let mut state = self.state()?;
        let flag = state.show_technical_details.entry(photo_id).or_insert(false);
        *flag = !*flag;
        Ok(*flag)
    }
}
