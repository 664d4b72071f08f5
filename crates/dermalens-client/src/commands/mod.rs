//! Controller command handlers.
//!
//! Each sub-module groups related commands by domain and extends
//! [`Controller`](crate::Controller) with the methods a host binds to its
//! UI: session bootstrap, photo and timeline mutations, and the analysis
//! orchestrator.

pub mod analysis;
pub mod photos;
pub mod session;
