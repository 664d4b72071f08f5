//! # dermalens-client
//!
//! Host-agnostic controller for the dermalens photo-analysis UI. The
//! controller owns the session timeline, runs the sequential analysis batch
//! against the backend, and exposes the presentation lookups the host shell
//! binds to its widgets. Hosts talk to it through the command methods and
//! listen on the event channel returned at construction.

pub mod clipboard;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod presentation;
pub mod state;

#[cfg(test)]
pub(crate) mod testutil;

use tracing_subscriber::{fmt, EnvFilter};

pub use clipboard::{Clipboard, ClipboardError, NullClipboard};
pub use commands::photos::IngestReport;
pub use commands::session::InitOptions;
pub use config::ClientConfig;
pub use controller::Controller;
pub use error::{ClientError, Result};
pub use events::{ToastPayload, ToastVariant, UiEvent};
pub use state::{ControllerState, EditingPhoto};

/// Install the default tracing subscriber. Call once at host startup.
///
/// Honours `RUST_LOG`; without it, controller and API traffic log at debug.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("dermalens_client=debug,dermalens_api=debug,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
