//! Shared types for the catalog admin workspace
//!
//! Wire models, error codes and response envelopes used by both the
//! HTTP client and the product editor.

pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use response::{ApiEnvelope, STATUS_SUCCESS};
