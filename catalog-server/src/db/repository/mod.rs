//! Repository Module
//!
//! Data access over the SQLite pool. Repositories are modules of free
//! functions taking the pool handle explicitly; no hidden connection
//! state. Storage failures are surfaced as-is — mapping them to
//! user-facing messages is the calling layer's job.

// Catalog structure
pub mod attribute;
pub mod attribute_set;
pub mod category;

// Products
pub mod product;
pub mod product_attribute;

// Tags
pub mod tag;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage-level unique-constraint violation, surfaced verbatim
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Soft delete blocked by a positive usage count
    #[error("Entity in use: {0}")]
    InUse(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                RepoError::Conflict(db.message().to_string())
            }
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a `?, ?, ...` placeholder list for dynamic `IN` clauses
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
