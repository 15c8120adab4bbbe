//! Data models
//!
//! Shared between hr-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).
//! Timestamps are unix-millis `i64`; calendar dates are `YYYY-MM-DD` strings.

pub mod attendance;
pub mod department;
pub mod document;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod performance;
pub mod position;
pub mod report;
pub mod training;
pub mod user;
pub mod webhook;

// Re-exports
pub use attendance::*;
pub use department::*;
pub use document::*;
pub use employee::*;
pub use leave::*;
pub use payroll::*;
pub use performance::*;
pub use position::*;
pub use report::*;
pub use training::*;
pub use user::*;
pub use webhook::*;
