//! Shared types for the catalog backend
//!
//! Data models, list-query types and small utilities used by the
//! catalog-server crate and its callers. DB row types gate their sqlx
//! derives behind the `db` feature so consumers can depend on this crate
//! without pulling in the database stack.

pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use query::{ListQuery, PaginatedResponse, SortDirection};
pub use serde::{Deserialize, Serialize};
