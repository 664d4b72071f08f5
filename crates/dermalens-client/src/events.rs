//! Typed events the controller pushes to the host shell.
//!
//! Hosts receive events over the unbounded channel returned by
//! [`Controller::new`](crate::Controller::new) and render them however the
//! toolkit likes (toast stack, notification center, test buffer).

use serde::Serialize;
use tokio::sync::mpsc;

pub const EVENT_TOAST: &str = "toast";

/// Visual flavour of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Primary,
    Success,
    Warning,
    Danger,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastPayload {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
    /// Icon name in the host's icon set.
    pub icon: String,
}

/// Events the controller emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum UiEvent {
    Toast(ToastPayload),
}

impl UiEvent {
    /// Wire name of the event, matching the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Toast(_) => EVENT_TOAST,
        }
    }
}

/// Sending half of the controller's event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl EventSender {
    /// Create the event channel; the receiver goes to the host.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event. A dropped receiver is logged, never fatal.
    pub fn emit(&self, event: UiEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            tracing::warn!(event = name, "UI event receiver dropped");
        }
    }

    /// Shorthand for the common toast case.
    pub fn toast(&self, title: &str, message: &str, variant: ToastVariant, icon: &str) {
        self.emit(UiEvent::Toast(ToastPayload {
            title: title.to_string(),
            message: message.to_string(),
            variant,
            icon: icon.to_string(),
        }));
    }
}
