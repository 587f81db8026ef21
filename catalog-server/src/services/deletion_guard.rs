//! Deletion Guard Service
//!
//! Usage-count queries that gate soft deletion. The count and the later
//! soft-delete are two independent round trips; a reference created in
//! between goes undetected. That window is accepted at back-office write
//! rates — callers needing stronger guarantees must serialize at the
//! delete boundary themselves.

use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, attribute, attribute_set, category};

/// Cross-cutting pre-delete decision point over the shared pool.
///
/// Category soft-delete checks its own count; attribute, value and set
/// soft-deletes do not — consulting this guard first is the caller's
/// responsibility.
#[derive(Clone)]
pub struct DeletionGuard {
    pool: SqlitePool,
}

impl DeletionGuard {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Non-deleted products on the category or its immediate children
    pub async fn active_products_in_category(&self, category_id: i64) -> RepoResult<i64> {
        category::count_active_products(&self.pool, category_id).await
    }

    /// Memberships of the attribute in non-deleted sets
    pub async fn attribute_usage_in_active_sets(&self, attribute_id: i64) -> RepoResult<i64> {
        attribute::count_usage_in_active_sets(&self.pool, attribute_id).await
    }

    /// Non-deleted products referencing the set
    pub async fn active_products_using_set(&self, set_id: i64) -> RepoResult<i64> {
        attribute_set::count_active_product_usage(&self.pool, set_id).await
    }

    /// Assignments of non-deleted products still referencing the value
    pub async fn assignments_for_value(&self, value_id: i64) -> RepoResult<i64> {
        attribute::count_assignments_for_value(&self.pool, value_id).await
    }

    pub async fn can_soft_delete_category(&self, category_id: i64) -> RepoResult<bool> {
        let usage = self.active_products_in_category(category_id).await?;
        tracing::debug!(category_id, usage, "category deletion guard");
        Ok(usage == 0)
    }

    pub async fn can_soft_delete_attribute(&self, attribute_id: i64) -> RepoResult<bool> {
        let usage = self.attribute_usage_in_active_sets(attribute_id).await?;
        tracing::debug!(attribute_id, usage, "attribute deletion guard");
        Ok(usage == 0)
    }

    pub async fn can_soft_delete_attribute_set(&self, set_id: i64) -> RepoResult<bool> {
        let usage = self.active_products_using_set(set_id).await?;
        tracing::debug!(set_id, usage, "attribute set deletion guard");
        Ok(usage == 0)
    }

    pub async fn can_soft_delete_attribute_value(&self, value_id: i64) -> RepoResult<bool> {
        let usage = self.assignments_for_value(value_id).await?;
        tracing::debug!(value_id, usage, "attribute value deletion guard");
        Ok(usage == 0)
    }
}
