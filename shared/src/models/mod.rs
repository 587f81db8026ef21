//! Data models
//!
//! Shared between catalog-server and its callers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod attribute;
pub mod attribute_set;
pub mod category;
pub mod product;
pub mod tag;

// Re-exports
pub use attribute::*;
pub use attribute_set::*;
pub use category::*;
pub use product::*;
pub use tag::*;
