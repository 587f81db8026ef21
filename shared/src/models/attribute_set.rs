//! Attribute Set Models
//!
//! Reusable named bundles of attributes assignable to products of
//! compatible categories.

use serde::{Deserialize, Serialize};

use super::attribute::{Attribute, AttributeValue};

/// Attribute set entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttributeSet {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create attribute set payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSetCreate {
    pub name: String,
    pub slug: String,
}

/// Update attribute set payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Member attribute of a set, joined with its non-deleted values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetMember {
    pub attribute: Attribute,
    pub values: Vec<AttributeValue>,
}

/// Members of a set, flattened for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetMembers {
    pub members: Vec<SetMember>,
    /// Comma-joined member attribute ids for bulk edit forms
    pub attribute_ids: String,
}
