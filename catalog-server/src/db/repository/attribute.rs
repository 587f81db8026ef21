//! Attribute Repository
//!
//! Attribute definitions, their display titles, and enumerated values.
//! Value synchronization is additive only; removal goes through the
//! explicit `delete_values` primitive.

use shared::models::{
    Attribute, AttributeCreate, AttributeTitle, AttributeTitleCreate, AttributeValue,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, placeholders};

const ATTRIBUTE_SELECT: &str = "SELECT id, name, slug, kind, is_searchable, is_discoverable, attribute_title_id, is_deleted, created_at, updated_at FROM attribute";
const TITLE_SELECT: &str = "SELECT id, title, created_at, updated_at FROM attribute_title";
const VALUE_SELECT: &str = "SELECT id, attribute_id, value, is_deleted, created_at, updated_at FROM attribute_value";

// ── Attribute titles ─────────────────────────────────────────

/// Create a display-section title
pub async fn create_title(pool: &SqlitePool, data: AttributeTitleCreate) -> RepoResult<AttributeTitle> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attribute_title (title, created_at, updated_at) VALUES (?1, ?2, ?2) RETURNING id",
    )
    .bind(&data.title)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_title_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attribute title".into()))
}

pub async fn find_title_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttributeTitle>> {
    let sql = format!("{TITLE_SELECT} WHERE id = ?");
    let title = sqlx::query_as::<_, AttributeTitle>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(title)
}

pub async fn list_titles(pool: &SqlitePool) -> RepoResult<Vec<AttributeTitle>> {
    let sql = format!("{TITLE_SELECT} ORDER BY id");
    let titles = sqlx::query_as::<_, AttributeTitle>(&sql).fetch_all(pool).await?;
    Ok(titles)
}

// ── Attributes ───────────────────────────────────────────────

/// Create an attribute definition
pub async fn create_attribute(pool: &SqlitePool, data: AttributeCreate) -> RepoResult<Attribute> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attribute (name, slug, kind, is_searchable, is_discoverable, attribute_title_id, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.kind)
    .bind(data.is_searchable.unwrap_or(false))
    .bind(data.is_discoverable.unwrap_or(false))
    .bind(data.attribute_title_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_attribute_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attribute".into()))
}

pub async fn find_attribute_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Attribute>> {
    let sql = format!("{ATTRIBUTE_SELECT} WHERE id = ?");
    let attribute = sqlx::query_as::<_, Attribute>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(attribute)
}

/// All non-deleted attributes
pub async fn list_attributes(pool: &SqlitePool) -> RepoResult<Vec<Attribute>> {
    let sql = format!("{ATTRIBUTE_SELECT} WHERE is_deleted = 0 ORDER BY id");
    let attributes = sqlx::query_as::<_, Attribute>(&sql).fetch_all(pool).await?;
    Ok(attributes)
}

pub async fn soft_delete_attribute(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE attribute SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Attribute values ─────────────────────────────────────────

/// All non-deleted values of an attribute
pub async fn list_values(pool: &SqlitePool, attribute_id: i64) -> RepoResult<Vec<AttributeValue>> {
    let sql = format!("{VALUE_SELECT} WHERE attribute_id = ? AND is_deleted = 0 ORDER BY id");
    let values = sqlx::query_as::<_, AttributeValue>(&sql)
        .bind(attribute_id)
        .fetch_all(pool)
        .await?;
    Ok(values)
}

/// Additive synchronization of enumerated values.
///
/// Each desired value is upserted on (attribute_id, value): an existing
/// row is touched in place, a missing one inserted. Values already in
/// storage but absent from `values` are left alone — removal is the
/// separate `delete_values` call. The loop is not transactional; a
/// failure partway through leaves the earlier upserts applied.
pub async fn sync_values(
    pool: &SqlitePool,
    attribute_id: i64,
    values: &[String],
) -> RepoResult<Vec<AttributeValue>> {
    let now = now_millis();
    for value in values {
        sqlx::query(
            "INSERT INTO attribute_value (attribute_id, value, is_deleted, created_at, updated_at) VALUES (?1, ?2, 0, ?3, ?3) ON CONFLICT (attribute_id, value) DO UPDATE SET updated_at = ?3",
        )
        .bind(attribute_id)
        .bind(value)
        .bind(now)
        .execute(pool)
        .await?;
    }
    list_values(pool, attribute_id).await
}

/// Hard-remove values by id — the explicit removal half of the additive
/// sync. The caller computes the id list deliberately.
pub async fn delete_values(pool: &SqlitePool, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM attribute_value WHERE id IN ({})",
        placeholders(ids.len())
    );
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

pub async fn soft_delete_value(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE attribute_value SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ── Usage counts ─────────────────────────────────────────────

/// Memberships of the attribute in non-deleted sets
pub async fn count_usage_in_active_sets(pool: &SqlitePool, attribute_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attribute_set_attribute link JOIN attribute_set s ON s.id = link.attribute_set_id WHERE link.attribute_id = ? AND s.is_deleted = 0",
    )
    .bind(attribute_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Assignments of non-deleted products still referencing a value
pub async fn count_assignments_for_value(pool: &SqlitePool, value_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM product_attribute_value pav JOIN product p ON p.id = pav.product_id WHERE pav.attribute_value_id = ? AND p.is_deleted = 0",
    )
    .bind(value_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
