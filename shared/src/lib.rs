//! Shared types for the HR platform
//!
//! Common types used across crates: error codes and response envelopes,
//! data models, and small utilities (timestamps, ID generation).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

// Error system re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
