//! Repository Module
//!
//! CRUD operations as free functions over `&SqlitePool` (or a
//! transaction connection where atomicity matters).

pub mod discount;
pub mod menu;
pub mod order;
pub mod student;
pub mod user;
pub mod vendor;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            RepoError::Duplicate(err.to_string())
        } else {
            RepoError::Database(err.to_string())
        }
    }
}

impl From<RepoError> for crate::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => crate::AppError::NotFound(msg),
            RepoError::Duplicate(msg) => crate::AppError::Conflict(msg),
            RepoError::Database(msg) => crate::AppError::Database(msg),
            RepoError::Validation(msg) => crate::AppError::Validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Whether an sqlx error is a SQLite UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|c| c == "2067" || c == "1555") // SQLITE_CONSTRAINT_UNIQUE / _PRIMARYKEY
            .unwrap_or(false),
        _ => false,
    }
}
