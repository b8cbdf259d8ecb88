//! Data models
//!
//! Shared between the HTTP client and the product editor.

pub mod category;
pub mod media;
pub mod product;

// Re-exports
pub use category::*;
pub use media::*;
pub use product::*;
