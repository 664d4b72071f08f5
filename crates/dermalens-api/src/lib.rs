//! # dermalens-api
//!
//! Typed REST client for the dermalens inference backend. Owns the wire
//! DTOs and the transport/status error split the controller's report log
//! depends on: HTTP failures keep their status code and raw body, every
//! other failure keeps its message.

pub mod client;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::{ApiError, Result};
