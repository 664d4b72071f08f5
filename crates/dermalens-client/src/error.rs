use thiserror::Error;

/// Errors surfaced by controller methods.
///
/// Most runtime failures are absorbed into state (the `error` field) or the
/// report log so the UI stays responsive; only programmatic failures bubble
/// up to the host.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A state lock was poisoned by a panic elsewhere.
    #[error("State lock poisoned")]
    LockPoisoned,

    /// The page URL handed to a command did not parse.
    #[error("Invalid page URL: {0}")]
    InvalidPageUrl(#[from] url::ParseError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
