//! Category Repository
//!
//! Self-referencing category tree with sibling-name validation, shallow
//! usage counting, and guarded soft deletion.

use shared::models::{Category, CategoryCreate, CategoryNode, CategoryUpdate};
use shared::query::{ListQuery, PaginatedResponse, SortDirection};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const CATEGORY_SELECT: &str = "SELECT id, name, slug, parent_id, max_single_category_products, max_multi_category_products, is_deleted, created_at, updated_at FROM category";

/// Sortable columns for `list`; anything else falls back to `id`
const SORT_COLUMNS: [&str; 4] = ["id", "name", "slug", "created_at"];

/// Find category by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let category = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

/// Create a category after checking name uniqueness among its siblings
pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    if sibling_name_exists(pool, &data.name, data.parent_id, None).await? {
        return Err(RepoError::Validation(format!(
            "Category '{}' already exists under the same parent",
            data.name
        )));
    }

    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO category (name, slug, parent_id, max_single_category_products, max_multi_category_products, is_deleted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.parent_id)
    .bind(data.max_single_category_products.unwrap_or(0))
    .bind(data.max_multi_category_products.unwrap_or(0))
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

/// Update a category, re-checking sibling name uniqueness against the
/// merged (name, parent) pair while excluding the row itself
pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    let name = data.name.as_deref().unwrap_or(&current.name);
    let parent_id = data.parent_id.or(current.parent_id);
    if sibling_name_exists(pool, name, parent_id, Some(id)).await? {
        return Err(RepoError::Validation(format!(
            "Category '{name}' already exists under the same parent"
        )));
    }

    let now = now_millis();
    sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), parent_id = COALESCE(?3, parent_id), max_single_category_products = COALESCE(?4, max_single_category_products), max_multi_category_products = COALESCE(?5, max_multi_category_products), updated_at = ?6 WHERE id = ?7",
    )
    .bind(data.name)
    .bind(data.slug)
    .bind(data.parent_id)
    .bind(data.max_single_category_products)
    .bind(data.max_multi_category_products)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Whether another category with this name shares the same parent.
/// Soft-deleted siblings still occupy the name (same rule as slugs).
async fn sibling_name_exists(
    pool: &SqlitePool,
    name: &str,
    parent_id: Option<i64>,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count: i64 = match parent_id {
        Some(parent) => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM category WHERE name = ?1 AND parent_id = ?2 AND id != COALESCE(?3, -1)",
            )
            .bind(name)
            .bind(parent)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT COUNT(*) FROM category WHERE name = ?1 AND parent_id IS NULL AND id != COALESCE(?2, -1)",
            )
            .bind(name)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?
        }
    };
    Ok(count > 0)
}

/// Load the node plus its full descendant subtree
pub async fn get_tree(pool: &SqlitePool, root_id: i64) -> RepoResult<CategoryNode> {
    let root = find_by_id(pool, root_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {root_id} not found")))?;
    let all = load_active(pool).await?;
    Ok(build_node(root, &all))
}

/// All root categories with their subtrees
pub async fn get_forest(pool: &SqlitePool) -> RepoResult<Vec<CategoryNode>> {
    let all = load_active(pool).await?;
    let roots: Vec<Category> = all.iter().filter(|c| c.parent_id.is_none()).cloned().collect();
    Ok(roots.into_iter().map(|root| build_node(root, &all)).collect())
}

async fn load_active(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE is_deleted = 0 ORDER BY id");
    let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(categories)
}

fn build_node(category: Category, all: &[Category]) -> CategoryNode {
    let children = all
        .iter()
        .filter(|c| c.parent_id == Some(category.id))
        .cloned()
        .map(|child| build_node(child, all))
        .collect();
    CategoryNode { category, children }
}

/// Non-deleted products linked to the category or its immediate children.
///
/// Deliberately shallow: grandchildren and deeper descendants do not
/// contribute to the count.
pub async fn count_active_products(pool: &SqlitePool, category_id: i64) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT p.id) FROM product p JOIN product_category pc ON pc.product_id = p.id WHERE p.is_deleted = 0 AND (pc.category_id = ?1 OR pc.category_id IN (SELECT id FROM category WHERE parent_id = ?1))",
    )
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Soft-delete a category; blocked while it still carries live products.
/// Does not cascade to descendant categories.
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let in_use = count_active_products(pool, id).await?;
    if in_use > 0 {
        return Err(RepoError::InUse(format!(
            "Category {id} still has {in_use} active product(s)"
        )));
    }

    let now = now_millis();
    let rows = sqlx::query("UPDATE category SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Paged listing of non-deleted categories with a case-insensitive name
/// filter. Sort columns outside the allow-list silently fall back to `id`.
pub async fn list(pool: &SqlitePool, query: ListQuery) -> RepoResult<PaginatedResponse<Category>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let offset = ((page - 1) * limit) as i64;

    let sort = query
        .sort
        .as_deref()
        .filter(|column| SORT_COLUMNS.contains(column))
        .unwrap_or("id");
    let direction = match query.direction {
        Some(SortDirection::Desc) => "DESC",
        _ => "ASC",
    };
    let search = query.search.unwrap_or_default();

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM category WHERE is_deleted = 0 AND name LIKE '%' || ?1 || '%'",
    )
    .bind(&search)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{CATEGORY_SELECT} WHERE is_deleted = 0 AND name LIKE '%' || ?1 || '%' ORDER BY {sort} {direction} LIMIT ?2 OFFSET ?3"
    );
    let data = sqlx::query_as::<_, Category>(&sql)
        .bind(&search)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(PaginatedResponse::new(data, total as u64, page, limit))
}
