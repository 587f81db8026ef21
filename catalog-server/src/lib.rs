//! Catalog Server - product catalog data core
//!
//! EAV product catalog: product attributes are admin-defined per-category
//! schemas instead of fixed columns. This crate owns the category tree,
//! the attribute/attribute-set catalog, the per-product assignment store,
//! tag deduplication, and the usage-count guards that gate soft deletion.
//! Callers supply already-validated command objects; the HTTP surface that
//! would produce them lives elsewhere.
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── config.rs      # env-driven configuration
//! ├── common/        # logging setup
//! ├── db/            # SQLite pool, migrations, repositories
//! └── services/      # deletion guard
//! ```

pub mod common;
pub mod config;
pub mod db;
pub mod services;

// Re-export public types
pub use config::Config;
pub use db::DbService;
pub use db::repository::{RepoError, RepoResult};
pub use services::DeletionGuard;
