//! Tag Model

use serde::{Deserialize, Serialize};

/// Tag entity
///
/// `name` holds the normalized form (lowercase, whitespace stripped) and
/// is unique; rows are created lazily on first use and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}
