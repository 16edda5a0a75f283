//! Data models
//!
//! Shared between kantin-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps are
//! `i64` milliseconds since epoch.

pub mod discount;
pub mod menu;
pub mod order;
pub mod student;
pub mod user;
pub mod vendor;

// Re-exports
pub use discount::*;
pub use menu::*;
pub use order::*;
pub use student::*;
pub use user::*;
pub use vendor::*;
