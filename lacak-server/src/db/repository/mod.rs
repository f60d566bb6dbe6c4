//! Repository Module
//!
//! Data access over the SQLite pool. The order repository implements the
//! core's [`OrderStore`](crate::orders::OrderStore) interface; everything
//! else is plain CRUD.

// Auth
pub mod user;

// Orders
pub mod order;

// Dashboard read models
pub mod stats;

// Re-exports
pub use order::OrderRepository;
pub use user::UserRepository;

use thiserror::Error;

/// Repository error types (non-order resources)
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
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
