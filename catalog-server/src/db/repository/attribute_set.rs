//! Attribute Set Repository
//!
//! Reusable named attribute bundles, their membership, and the categories
//! they are eligible for. Membership synchronization is additive only;
//! removal goes through `delete_membership`.

use shared::models::{
    Attribute, AttributeSet, AttributeSetCreate, AttributeSetUpdate, SetMember, SetMembers,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, attribute, placeholders};

const SET_SELECT: &str = "SELECT id, name, slug, is_deleted, created_at, updated_at FROM attribute_set";

/// Create an attribute set
pub async fn create(pool: &SqlitePool, data: AttributeSetCreate) -> RepoResult<AttributeSet> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO attribute_set (name, slug, is_deleted, created_at, updated_at) VALUES (?1, ?2, 0, ?3, ?3) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attribute set".into()))
}

/// Update an attribute set
pub async fn update(pool: &SqlitePool, id: i64, data: AttributeSetUpdate) -> RepoResult<AttributeSet> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE attribute_set SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), updated_at = ?3 WHERE id = ?4",
    )
    .bind(data.name)
    .bind(data.slug)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Attribute set {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Attribute set {id} not found")))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttributeSet>> {
    let sql = format!("{SET_SELECT} WHERE id = ?");
    let set = sqlx::query_as::<_, AttributeSet>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(set)
}

// ── Membership ───────────────────────────────────────────────

/// Additive membership sync: missing (attribute, set) pairs are inserted;
/// pairs already in storage but absent from `attribute_ids` are never
/// removed here — that is the deliberate `delete_membership` call. The
/// loop is not transactional.
pub async fn sync_membership(
    pool: &SqlitePool,
    set_id: i64,
    attribute_ids: &[i64],
) -> RepoResult<()> {
    for attribute_id in attribute_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO attribute_set_attribute (attribute_id, attribute_set_id) VALUES (?1, ?2)",
        )
        .bind(*attribute_id)
        .bind(set_id)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Explicit membership removal, the paired counterpart of the sync
pub async fn delete_membership(
    pool: &SqlitePool,
    attribute_ids: &[i64],
    set_id: i64,
) -> RepoResult<u64> {
    if attribute_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM attribute_set_attribute WHERE attribute_set_id = ? AND attribute_id IN ({})",
        placeholders(attribute_ids.len())
    );
    let mut query = sqlx::query(&sql).bind(set_id);
    for attribute_id in attribute_ids {
        query = query.bind(*attribute_id);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Non-deleted member attributes joined with their non-deleted values,
/// flattened for display (comma-joined id list for bulk edit forms)
pub async fn get_members(pool: &SqlitePool, set_id: i64) -> RepoResult<SetMembers> {
    let attributes = sqlx::query_as::<_, Attribute>(
        "SELECT a.id, a.name, a.slug, a.kind, a.is_searchable, a.is_discoverable, a.attribute_title_id, a.is_deleted, a.created_at, a.updated_at FROM attribute a JOIN attribute_set_attribute link ON link.attribute_id = a.id WHERE link.attribute_set_id = ? AND a.is_deleted = 0 ORDER BY a.id",
    )
    .bind(set_id)
    .fetch_all(pool)
    .await?;

    let mut members = Vec::with_capacity(attributes.len());
    for attr in attributes {
        let values = attribute::list_values(pool, attr.id).await?;
        members.push(SetMember { attribute: attr, values });
    }

    let attribute_ids = members
        .iter()
        .map(|member| member.attribute.id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(SetMembers { members, attribute_ids })
}

// ── Category eligibility ─────────────────────────────────────

/// Additive eligibility links between a set and categories
pub async fn link_categories(
    pool: &SqlitePool,
    set_id: i64,
    category_ids: &[i64],
) -> RepoResult<()> {
    for category_id in category_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO attribute_set_category (attribute_set_id, category_id) VALUES (?1, ?2)",
        )
        .bind(set_id)
        .bind(*category_id)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Explicit eligibility removal
pub async fn unlink_categories(
    pool: &SqlitePool,
    category_ids: &[i64],
    set_id: i64,
) -> RepoResult<u64> {
    if category_ids.is_empty() {
        return Ok(0);
    }
    let sql = format!(
        "DELETE FROM attribute_set_category WHERE attribute_set_id = ? AND category_id IN ({})",
        placeholders(category_ids.len())
    );
    let mut query = sqlx::query(&sql).bind(set_id);
    for category_id in category_ids {
        query = query.bind(*category_id);
    }
    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Non-deleted sets eligible for a category
pub async fn sets_for_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<AttributeSet>> {
    let sets = sqlx::query_as::<_, AttributeSet>(
        "SELECT s.id, s.name, s.slug, s.is_deleted, s.created_at, s.updated_at FROM attribute_set s JOIN attribute_set_category link ON link.attribute_set_id = s.id WHERE link.category_id = ? AND s.is_deleted = 0 ORDER BY s.id",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(sets)
}

// ── Usage ────────────────────────────────────────────────────

/// Non-deleted products referencing the set
pub async fn count_active_product_usage(pool: &SqlitePool, set_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM product_attribute_set link JOIN product p ON p.id = link.product_id WHERE link.attribute_set_id = ? AND p.is_deleted = 0",
    )
    .bind(set_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Flag the set as deleted. Callers are expected to consult
/// `count_active_product_usage` first — this call does not block on it.
pub async fn soft_delete(pool: &SqlitePool, set_id: i64) -> RepoResult<bool> {
    let now = now_millis();
    let rows = sqlx::query("UPDATE attribute_set SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
        .bind(now)
        .bind(set_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
