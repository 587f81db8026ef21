//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity (self-referencing tree node)
///
/// `slug` is globally unique, soft-deleted rows included. The
/// `(name, parent_id)` pair is unique among siblings; that rule lives in
/// the repository because NULL parents defeat a plain DB constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    /// Product cap when a product lives in this category alone
    pub max_single_category_products: i64,
    /// Product cap when a product spans multiple categories
    pub max_multi_category_products: i64,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub max_single_category_products: Option<i64>,
    pub max_multi_category_products: Option<i64>,
}

/// Update category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_single_category_products: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_multi_category_products: Option<i64>,
}

/// Category with its full descendant subtree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}
