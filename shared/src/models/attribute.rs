//! Attribute Catalog Models
//!
//! Attribute definitions, their display-section titles, and the
//! enumerated values of dropdown attributes.

use serde::{Deserialize, Serialize};

/// How a product supplies the value for an attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AttributeKind {
    /// Selection from admin-defined enumerated values
    Dropdown,
    /// Free-form text supplied per product
    FreeText,
}

/// Display-section label grouping attributes (e.g. "Dimensions")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttributeTitle {
    pub id: i64,
    pub title: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create attribute title payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeTitleCreate {
    pub title: String,
}

/// Attribute entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attribute {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub kind: AttributeKind,
    pub is_searchable: bool,
    pub is_discoverable: bool,
    /// Owning display section
    pub attribute_title_id: i64,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create attribute payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeCreate {
    pub name: String,
    pub slug: String,
    pub kind: AttributeKind,
    pub is_searchable: Option<bool>,
    pub is_discoverable: Option<bool>,
    pub attribute_title_id: i64,
}

/// Enumerated value of a dropdown attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttributeValue {
    pub id: i64,
    pub attribute_id: i64,
    pub value: String,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
