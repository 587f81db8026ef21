//! Product Repository
//!
//! Minimal product lifecycle: enough to anchor category links, attribute
//! set links, and the per-attribute assignment store. Richer product CRUD
//! lives outside this core.

use shared::models::{Product, ProductCreate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const PRODUCT_SELECT: &str = "SELECT id, sku, is_deleted, created_at, updated_at FROM product";

/// Create a product and link its categories and attribute sets.
/// The link inserts are not transactional with the product insert.
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (sku, is_deleted, created_at, updated_at) VALUES (?1, 0, ?2, ?2) RETURNING id",
    )
    .bind(&data.sku)
    .bind(now)
    .fetch_one(pool)
    .await?;

    link_categories(pool, id, &data.category_ids).await?;
    link_attribute_sets(pool, id, &data.attribute_set_ids).await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

/// Idempotent product-category links
pub async fn link_categories(
    pool: &SqlitePool,
    product_id: i64,
    category_ids: &[i64],
) -> RepoResult<()> {
    for category_id in category_ids {
        sqlx::query("INSERT OR IGNORE INTO product_category (product_id, category_id) VALUES (?1, ?2)")
            .bind(product_id)
            .bind(*category_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Idempotent product-attribute-set links
pub async fn link_attribute_sets(
    pool: &SqlitePool,
    product_id: i64,
    attribute_set_ids: &[i64],
) -> RepoResult<()> {
    for set_id in attribute_set_ids {
        sqlx::query("INSERT OR IGNORE INTO product_attribute_set (product_id, attribute_set_id) VALUES (?1, ?2)")
            .bind(product_id)
            .bind(*set_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE product SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
