//! Product Models
//!
//! The product row itself is deliberately thin; descriptive data lives in
//! the per-attribute assignment rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: String,
    /// Categories the product is listed under
    #[serde(default)]
    pub category_ids: Vec<i64>,
    /// Attribute sets the product draws its schema from
    #[serde(default)]
    pub attribute_set_ids: Vec<i64>,
}

/// One EAV assignment row binding a product to an attribute.
///
/// Exactly one of `attribute_value_id` / `free_text_value` is populated;
/// multi-select dropdowns use one row per selected value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductAttributeAssignment {
    pub id: i64,
    pub product_id: i64,
    pub attribute_id: i64,
    pub attribute_set_id: i64,
    /// Denormalized owning title for fast reads
    pub attribute_title_id: i64,
    pub attribute_value_id: Option<i64>,
    pub free_text_value: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Write payload value: dropdown selections or free text.
///
/// Which shape is valid depends on the owning attribute's kind; the store
/// rejects mismatches at its boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeWriteValue {
    Selections(Vec<i64>),
    Text(String),
}

/// Write payload for one attribute of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentInput {
    pub attribute_id: i64,
    pub attribute_title_id: i64,
    pub value: AttributeWriteValue,
}

/// Read-side display value: scalar for free text, ordered list for
/// dropdown selections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeDisplayValue {
    Text(String),
    List(Vec<String>),
}

/// Display document: title -> attribute name -> value
pub type ProductAttributeDocument = BTreeMap<String, BTreeMap<String, AttributeDisplayValue>>;
