//! Shared types for the Kantin backend
//!
//! Data models and utility types used by the server and by API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
