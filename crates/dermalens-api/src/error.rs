use thiserror::Error;

/// Errors produced by the REST client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection-level failure: DNS, refused connection, closed socket, or
    /// a body that could not be read or decoded.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status. The raw body text is
    /// kept because the analysis report quotes it verbatim.
    #[error("{status} {body}")]
    Status { status: u16, body: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
