//! Protocol and behaviour constants shared across the workspace.

/// Model selector sent with every analyze request.
pub const ANALYSIS_MODEL: &str = "medsiglip";

/// Default margin threshold forwarded to the backend interpreter. When the
/// top two classes straddle the tumor boundary within this margin, the
/// backend annotates the result as unclear.
pub const DEFAULT_MARGIN_THRESHOLD: f64 = 0.05;

/// Delay between staging new photos and kicking off the analysis batch,
/// giving the UI a beat to render the new cards first.
pub const ANALYSIS_DEBOUNCE_MS: u64 = 300;

/// Cookie carrying the backend correlation id.
pub const SESSION_COOKIE: &str = "session_id";

/// Query parameter that toggles the on-page debug panels.
pub const DEBUG_QUERY_PARAM: &str = "debug";
