//! Tag Repository
//!
//! Normalized free-text tags: lazily created on first use, deduplicated
//! by their normalized name, never deleted by this core.

use shared::models::Tag;
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::RepoResult;

const TAG_SELECT: &str = "SELECT id, name, created_at FROM tag";

/// Canonical tag form: lowercase with all whitespace removed
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Resolve each name to a tag id, creating missing tags on first use.
///
/// Returns ids in input order; names normalizing to the same string
/// resolve to the same id. INSERT OR IGNORE against the unique name index
/// keeps two concurrent first-use resolutions from double-inserting.
pub async fn resolve_or_create(pool: &SqlitePool, names: &[String]) -> RepoResult<Vec<i64>> {
    let now = now_millis();
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let normalized = normalize(name);
        sqlx::query("INSERT OR IGNORE INTO tag (name, created_at) VALUES (?1, ?2)")
            .bind(&normalized)
            .bind(now)
            .execute(pool)
            .await?;
        let id: i64 = sqlx::query_scalar("SELECT id FROM tag WHERE name = ?")
            .bind(&normalized)
            .fetch_one(pool)
            .await?;
        ids.push(id);
    }
    Ok(ids)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Tag>> {
    let sql = format!("{TAG_SELECT} WHERE id = ?");
    let tag = sqlx::query_as::<_, Tag>(&sql).bind(id).fetch_optional(pool).await?;
    Ok(tag)
}

/// Idempotent (product, tag) pair inserts
pub async fn link_products(pool: &SqlitePool, product_id: i64, tag_ids: &[i64]) -> RepoResult<()> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO product_tag (product_id, tag_id) VALUES (?1, ?2)")
            .bind(product_id)
            .bind(*tag_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

/// Tags linked to a product
pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name, t.created_at FROM tag t JOIN product_tag pt ON pt.tag_id = t.id WHERE pt.product_id = ? ORDER BY t.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product;
    use crate::db::test_support::test_pool;
    use shared::models::ProductCreate;

    #[test]
    fn test_normalize_lowercases_and_strips_whitespace() {
        assert_eq!(normalize("Modern"), "modern");
        assert_eq!(normalize("  MODERN  "), "modern");
        assert_eq!(normalize("Mid Century\tModern"), "midcenturymodern");
    }

    #[tokio::test]
    async fn test_resolve_or_create_deduplicates_variants() {
        let pool = test_pool().await;
        let ids = resolve_or_create(
            &pool,
            &["Modern".into(), "modern ".into(), "MODERN".into()],
        )
        .await
        .unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);

        // Exactly one stored row, holding the normalized name
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        let tag = find_by_id(&pool, ids[0]).await.unwrap().unwrap();
        assert_eq!(tag.name, "modern");
    }

    #[tokio::test]
    async fn test_resolve_or_create_reuses_existing_across_calls() {
        let pool = test_pool().await;
        let first = resolve_or_create(&pool, &["Rustic".into()]).await.unwrap();
        let second = resolve_or_create(&pool, &["rustic".into(), "Vintage".into()])
            .await
            .unwrap();

        assert_eq!(first[0], second[0]);
        assert_ne!(second[0], second[1]);
    }

    #[tokio::test]
    async fn test_link_products_is_idempotent() {
        let pool = test_pool().await;
        let prod = product::create(
            &pool,
            ProductCreate { sku: "SKU-1".into(), category_ids: vec![], attribute_set_ids: vec![] },
        )
        .await
        .unwrap();
        let ids = resolve_or_create(&pool, &["modern".into(), "rustic".into()])
            .await
            .unwrap();

        link_products(&pool, prod.id, &ids).await.unwrap();
        link_products(&pool, prod.id, &ids).await.unwrap();

        let tags = find_by_product(&pool, prod.id).await.unwrap();
        assert_eq!(tags.len(), 2);
    }
}
