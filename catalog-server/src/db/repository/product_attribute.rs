//! Product Attribute Store
//!
//! EAV assignment rows binding products to attributes. `assign` and
//! `update` only ever insert or touch rows; removal is the explicit
//! `remove` primitive. The dropdown-vs-free-text shape of each input is
//! checked against the owning attribute's kind at this boundary.

use std::collections::BTreeMap;

use shared::models::{
    AssignmentInput, Attribute, AttributeDisplayValue, AttributeKind, AttributeWriteValue,
    ProductAttributeAssignment, ProductAttributeDocument,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, attribute, placeholders};

const ASSIGNMENT_SELECT: &str = "SELECT id, product_id, attribute_id, attribute_set_id, attribute_title_id, attribute_value_id, free_text_value, created_at, updated_at FROM product_attribute_value";

/// Insert-only assignment used at product creation.
///
/// Dropdown inputs insert one row per selected value id; free-text inputs
/// insert exactly one row. The batch is not transactional: a failure
/// partway through leaves the earlier inputs applied.
pub async fn assign(
    pool: &SqlitePool,
    product_id: i64,
    set_id: i64,
    inputs: &[AssignmentInput],
) -> RepoResult<()> {
    let now = now_millis();
    for input in inputs {
        let attr = load_attribute(pool, input.attribute_id).await?;
        match (&input.value, attr.kind) {
            (AttributeWriteValue::Selections(value_ids), AttributeKind::Dropdown) => {
                for value_id in value_ids {
                    insert_selection(pool, product_id, set_id, input, *value_id, now).await?;
                }
            }
            (AttributeWriteValue::Text(text), AttributeKind::FreeText) => {
                insert_text(pool, product_id, set_id, input, text, now).await?;
            }
            _ => return Err(kind_mismatch(&attr)),
        }
    }
    Ok(())
}

/// Diff-based update, asymmetric by kind.
///
/// Dropdown: append-only — desired value ids without a row are inserted;
/// existing rows absent from the desired set are left untouched. Free
/// text: the single existing row is rewritten in place, or inserted when
/// absent — never a second row. This call never deletes; that is
/// `remove`'s job. The batch is not transactional.
pub async fn update(
    pool: &SqlitePool,
    product_id: i64,
    set_id: i64,
    inputs: &[AssignmentInput],
) -> RepoResult<()> {
    let now = now_millis();
    for input in inputs {
        let attr = load_attribute(pool, input.attribute_id).await?;
        match (&input.value, attr.kind) {
            (AttributeWriteValue::Selections(value_ids), AttributeKind::Dropdown) => {
                for value_id in value_ids {
                    // The partial unique index on (product, attribute, value)
                    // makes this a no-op for rows that already exist
                    sqlx::query(
                        "INSERT OR IGNORE INTO product_attribute_value (product_id, attribute_id, attribute_set_id, attribute_title_id, attribute_value_id, free_text_value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
                    )
                    .bind(product_id)
                    .bind(input.attribute_id)
                    .bind(set_id)
                    .bind(input.attribute_title_id)
                    .bind(*value_id)
                    .bind(now)
                    .execute(pool)
                    .await?;
                }
            }
            (AttributeWriteValue::Text(text), AttributeKind::FreeText) => {
                let existing: Option<i64> = sqlx::query_scalar(
                    "SELECT id FROM product_attribute_value WHERE product_id = ? AND attribute_id = ? AND attribute_value_id IS NULL",
                )
                .bind(product_id)
                .bind(input.attribute_id)
                .fetch_optional(pool)
                .await?;

                match existing {
                    Some(row_id) => {
                        sqlx::query(
                            "UPDATE product_attribute_value SET free_text_value = ?, updated_at = ? WHERE id = ?",
                        )
                        .bind(text)
                        .bind(now)
                        .bind(row_id)
                        .execute(pool)
                        .await?;
                    }
                    None => insert_text(pool, product_id, set_id, input, text, now).await?,
                }
            }
            _ => return Err(kind_mismatch(&attr)),
        }
    }
    Ok(())
}

/// The only removal path for assignment rows: by selected value ids
/// (dropdown) or by exact text (free text), scoped to one product and
/// attribute.
pub async fn remove(
    pool: &SqlitePool,
    product_id: i64,
    attribute_id: i64,
    selector: &AttributeWriteValue,
) -> RepoResult<u64> {
    match selector {
        AttributeWriteValue::Selections(value_ids) => {
            if value_ids.is_empty() {
                return Ok(0);
            }
            let sql = format!(
                "DELETE FROM product_attribute_value WHERE product_id = ? AND attribute_id = ? AND attribute_value_id IN ({})",
                placeholders(value_ids.len())
            );
            let mut query = sqlx::query(&sql).bind(product_id).bind(attribute_id);
            for value_id in value_ids {
                query = query.bind(*value_id);
            }
            let rows = query.execute(pool).await?;
            Ok(rows.rows_affected())
        }
        AttributeWriteValue::Text(text) => {
            let rows = sqlx::query(
                "DELETE FROM product_attribute_value WHERE product_id = ? AND attribute_id = ? AND attribute_value_id IS NULL AND free_text_value = ?",
            )
            .bind(product_id)
            .bind(attribute_id)
            .bind(text)
            .execute(pool)
            .await?;
            Ok(rows.rows_affected())
        }
    }
}

/// Whole-batch title check: every input's `attribute_title_id` must equal
/// the one stored on its attribute. A single mismatch invalidates the
/// whole batch — the caller rejects the write wholesale, no partial
/// application.
pub async fn validate_title_consistency(
    pool: &SqlitePool,
    inputs: &[AssignmentInput],
) -> RepoResult<bool> {
    for input in inputs {
        let stored: i64 = sqlx::query_scalar("SELECT attribute_title_id FROM attribute WHERE id = ?")
            .bind(input.attribute_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                RepoError::NotFound(format!("Attribute {} not found", input.attribute_id))
            })?;
        if stored != input.attribute_title_id {
            return Ok(false);
        }
    }
    Ok(true)
}

/// All assignment rows of a product, flat
pub async fn list_rows(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<ProductAttributeAssignment>> {
    let sql = format!("{ASSIGNMENT_SELECT} WHERE product_id = ? ORDER BY id");
    let rows = sqlx::query_as::<_, ProductAttributeAssignment>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Reshape the flat assignment rows into a display document:
/// title -> attribute name -> scalar (free text) or insertion-ordered
/// value-text list (dropdown).
pub async fn list_for_product(pool: &SqlitePool, product_id: i64) -> RepoResult<ProductAttributeDocument> {
    #[derive(sqlx::FromRow)]
    struct DisplayRow {
        title: String,
        attribute_name: String,
        kind: AttributeKind,
        free_text_value: Option<String>,
        value_text: Option<String>,
    }

    let rows = sqlx::query_as::<_, DisplayRow>(
        "SELECT t.title AS title, a.name AS attribute_name, a.kind AS kind, pav.free_text_value AS free_text_value, av.value AS value_text FROM product_attribute_value pav JOIN attribute a ON a.id = pav.attribute_id JOIN attribute_title t ON t.id = pav.attribute_title_id LEFT JOIN attribute_value av ON av.id = pav.attribute_value_id WHERE pav.product_id = ? ORDER BY pav.id",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    let mut document: ProductAttributeDocument = BTreeMap::new();
    for row in rows {
        let section = document.entry(row.title).or_default();
        match row.kind {
            AttributeKind::FreeText => {
                if let Some(text) = row.free_text_value {
                    section.insert(row.attribute_name, AttributeDisplayValue::Text(text));
                }
            }
            AttributeKind::Dropdown => {
                let entry = section
                    .entry(row.attribute_name)
                    .or_insert_with(|| AttributeDisplayValue::List(Vec::new()));
                if let (AttributeDisplayValue::List(items), Some(text)) = (entry, row.value_text) {
                    items.push(text);
                }
            }
        }
    }
    Ok(document)
}

// ── Internal helpers ─────────────────────────────────────────

async fn load_attribute(pool: &SqlitePool, attribute_id: i64) -> RepoResult<Attribute> {
    attribute::find_attribute_by_id(pool, attribute_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Attribute {attribute_id} not found")))
}

fn kind_mismatch(attr: &Attribute) -> RepoError {
    RepoError::Validation(format!(
        "Value shape does not match kind {:?} of attribute {}",
        attr.kind, attr.id
    ))
}

async fn insert_selection(
    pool: &SqlitePool,
    product_id: i64,
    set_id: i64,
    input: &AssignmentInput,
    value_id: i64,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_attribute_value (product_id, attribute_id, attribute_set_id, attribute_title_id, attribute_value_id, free_text_value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
    )
    .bind(product_id)
    .bind(input.attribute_id)
    .bind(set_id)
    .bind(input.attribute_title_id)
    .bind(value_id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

async fn insert_text(
    pool: &SqlitePool,
    product_id: i64,
    set_id: i64,
    input: &AssignmentInput,
    text: &str,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_attribute_value (product_id, attribute_id, attribute_set_id, attribute_title_id, attribute_value_id, free_text_value, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?6)",
    )
    .bind(product_id)
    .bind(input.attribute_id)
    .bind(set_id)
    .bind(input.attribute_title_id)
    .bind(text)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{attribute_set, product};
    use crate::db::test_support::test_pool;
    use shared::models::{
        AttributeCreate, AttributeSetCreate, AttributeTitleCreate, AttributeValue, ProductCreate,
    };

    struct Fixture {
        product_id: i64,
        set_id: i64,
        title_id: i64,
        color: Attribute,
        color_values: Vec<AttributeValue>,
        material: Attribute,
    }

    /// One product with a set holding a dropdown ("Color": Red/Blue/Green)
    /// and a free-text ("Material") attribute under the same title.
    async fn fixture(pool: &SqlitePool) -> Fixture {
        let title = attribute::create_title(pool, AttributeTitleCreate { title: "Specs".into() })
            .await
            .unwrap();
        let color = attribute::create_attribute(
            pool,
            AttributeCreate {
                name: "Color".into(),
                slug: "color".into(),
                kind: AttributeKind::Dropdown,
                is_searchable: None,
                is_discoverable: None,
                attribute_title_id: title.id,
            },
        )
        .await
        .unwrap();
        let color_values = attribute::sync_values(
            pool,
            color.id,
            &["Red".into(), "Blue".into(), "Green".into()],
        )
        .await
        .unwrap();
        let material = attribute::create_attribute(
            pool,
            AttributeCreate {
                name: "Material".into(),
                slug: "material".into(),
                kind: AttributeKind::FreeText,
                is_searchable: None,
                is_discoverable: None,
                attribute_title_id: title.id,
            },
        )
        .await
        .unwrap();

        let set = attribute_set::create(
            pool,
            AttributeSetCreate { name: "Tiles".into(), slug: "tiles".into() },
        )
        .await
        .unwrap();
        attribute_set::sync_membership(pool, set.id, &[color.id, material.id])
            .await
            .unwrap();

        let prod = product::create(
            pool,
            ProductCreate {
                sku: "SKU-1".into(),
                category_ids: vec![],
                attribute_set_ids: vec![set.id],
            },
        )
        .await
        .unwrap();

        Fixture {
            product_id: prod.id,
            set_id: set.id,
            title_id: title.id,
            color,
            color_values,
            material,
        }
    }

    fn selection(f: &Fixture, value_ids: Vec<i64>) -> AssignmentInput {
        AssignmentInput {
            attribute_id: f.color.id,
            attribute_title_id: f.title_id,
            value: AttributeWriteValue::Selections(value_ids),
        }
    }

    fn text(f: &Fixture, value: &str) -> AssignmentInput {
        AssignmentInput {
            attribute_id: f.material.id,
            attribute_title_id: f.title_id,
            value: AttributeWriteValue::Text(value.into()),
        }
    }

    #[tokio::test]
    async fn test_assign_fans_out_dropdown_selections() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let red = f.color_values[0].id;
        let blue = f.color_values[1].id;

        assign(
            &pool,
            f.product_id,
            f.set_id,
            &[selection(&f, vec![red, blue]), text(&f, "Ceramic")],
        )
        .await
        .unwrap();

        let rows = list_rows(&pool, f.product_id).await.unwrap();
        assert_eq!(rows.len(), 3);
        let dropdown_rows: Vec<_> = rows
            .iter()
            .filter(|r| r.attribute_id == f.color.id)
            .collect();
        assert_eq!(dropdown_rows.len(), 2);
        assert!(dropdown_rows.iter().all(|r| r.free_text_value.is_none()));

        let text_row = rows.iter().find(|r| r.attribute_id == f.material.id).unwrap();
        assert_eq!(text_row.free_text_value.as_deref(), Some("Ceramic"));
        assert!(text_row.attribute_value_id.is_none());
    }

    #[tokio::test]
    async fn test_assign_rejects_kind_mismatch() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;

        // Free text payload aimed at the dropdown attribute
        let bad = AssignmentInput {
            attribute_id: f.color.id,
            attribute_title_id: f.title_id,
            value: AttributeWriteValue::Text("Red".into()),
        };
        let err = assign(&pool, f.product_id, f.set_id, &[bad]).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert!(list_rows(&pool, f.product_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_free_text_update_rewrites_in_place() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        assign(&pool, f.product_id, f.set_id, &[text(&f, "red")]).await.unwrap();

        update(&pool, f.product_id, f.set_id, &[text(&f, "blue")]).await.unwrap();

        // Exactly one row, now holding "blue" — never a second row
        let rows = list_rows(&pool, f.product_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].free_text_value.as_deref(), Some("blue"));
    }

    #[tokio::test]
    async fn test_free_text_update_inserts_when_absent() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;

        update(&pool, f.product_id, f.set_id, &[text(&f, "Ceramic")]).await.unwrap();

        let rows = list_rows(&pool, f.product_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].free_text_value.as_deref(), Some("Ceramic"));
    }

    #[tokio::test]
    async fn test_dropdown_update_is_append_only() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let red = f.color_values[0].id;
        let blue = f.color_values[1].id;
        let green = f.color_values[2].id;

        assign(&pool, f.product_id, f.set_id, &[selection(&f, vec![red, blue])])
            .await
            .unwrap();
        // Desired set {blue, green}: green is added, red is NOT removed
        update(&pool, f.product_id, f.set_id, &[selection(&f, vec![blue, green])])
            .await
            .unwrap();

        let rows = list_rows(&pool, f.product_id).await.unwrap();
        let mut value_ids: Vec<i64> = rows.iter().filter_map(|r| r.attribute_value_id).collect();
        value_ids.sort_unstable();
        let mut expected = vec![red, blue, green];
        expected.sort_unstable();
        assert_eq!(value_ids, expected);
    }

    #[tokio::test]
    async fn test_remove_dropdown_rows_by_value_ids() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let red = f.color_values[0].id;
        let blue = f.color_values[1].id;
        assign(&pool, f.product_id, f.set_id, &[selection(&f, vec![red, blue])])
            .await
            .unwrap();

        let removed = remove(
            &pool,
            f.product_id,
            f.color.id,
            &AttributeWriteValue::Selections(vec![red]),
        )
        .await
        .unwrap();
        assert_eq!(removed, 1);

        let rows = list_rows(&pool, f.product_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attribute_value_id, Some(blue));
    }

    #[tokio::test]
    async fn test_remove_free_text_row_by_exact_text() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        assign(&pool, f.product_id, f.set_id, &[text(&f, "Ceramic")]).await.unwrap();

        // Wrong text removes nothing
        let removed = remove(
            &pool,
            f.product_id,
            f.material.id,
            &AttributeWriteValue::Text("Porcelain".into()),
        )
        .await
        .unwrap();
        assert_eq!(removed, 0);

        let removed = remove(
            &pool,
            f.product_id,
            f.material.id,
            &AttributeWriteValue::Text("Ceramic".into()),
        )
        .await
        .unwrap();
        assert_eq!(removed, 1);
        assert!(list_rows(&pool, f.product_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validate_title_consistency_whole_batch() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let other_title =
            attribute::create_title(&pool, AttributeTitleCreate { title: "Other".into() })
                .await
                .unwrap();

        let ok = validate_title_consistency(
            &pool,
            &[selection(&f, vec![f.color_values[0].id]), text(&f, "Ceramic")],
        )
        .await
        .unwrap();
        assert!(ok);

        // One wrong title id poisons the whole batch
        let mismatched = AssignmentInput {
            attribute_id: f.material.id,
            attribute_title_id: other_title.id,
            value: AttributeWriteValue::Text("Ceramic".into()),
        };
        let ok = validate_title_consistency(
            &pool,
            &[selection(&f, vec![f.color_values[0].id]), mismatched],
        )
        .await
        .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_validate_title_consistency_missing_attribute() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let ghost = AssignmentInput {
            attribute_id: 9999,
            attribute_title_id: f.title_id,
            value: AttributeWriteValue::Text("x".into()),
        };
        let err = validate_title_consistency(&pool, &[ghost]).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_for_product_builds_display_document() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        let red = f.color_values[0].id;
        let green = f.color_values[2].id;

        assign(
            &pool,
            f.product_id,
            f.set_id,
            &[selection(&f, vec![green, red]), text(&f, "Ceramic")],
        )
        .await
        .unwrap();

        let document = list_for_product(&pool, f.product_id).await.unwrap();
        let section = document.get("Specs").unwrap();
        assert_eq!(
            section.get("Material"),
            Some(&AttributeDisplayValue::Text("Ceramic".into()))
        );
        // Dropdown values keep insertion order
        assert_eq!(
            section.get("Color"),
            Some(&AttributeDisplayValue::List(vec!["Green".into(), "Red".into()]))
        );
    }

    #[tokio::test]
    async fn test_list_for_product_document_serializes_nested() {
        let pool = test_pool().await;
        let f = fixture(&pool).await;
        assign(&pool, f.product_id, f.set_id, &[text(&f, "Ceramic")]).await.unwrap();

        let document = list_for_product(&pool, f.product_id).await.unwrap();
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["Specs"]["Material"], serde_json::json!("Ceramic"));
    }
}
