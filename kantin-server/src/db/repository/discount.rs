//! Discount Repository
//!
//! Discounts plus the menu_discount assignment join. Assignment rows are
//! the sole authority for applicability; deleting them never touches
//! order lines, whose prices are already frozen.

use super::{RepoError, RepoResult};
use shared::models::{Discount, DiscountCreate, DiscountUpdate, MenuDiscount, MenuItem};
use sqlx::SqlitePool;

const DISCOUNT_SELECT: &str =
    "SELECT id, name, percentage, starts_at, ends_at, created_at, updated_at FROM discount";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Discount>> {
    let sql = format!("{DISCOUNT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Discount>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Discount>> {
    let sql = format!("{DISCOUNT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Discount>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Discounts whose validity window contains `now` (boundary inclusive)
pub async fn find_active(pool: &SqlitePool, now: i64) -> RepoResult<Vec<Discount>> {
    let sql = format!("{DISCOUNT_SELECT} WHERE starts_at <= ?1 AND ends_at >= ?1 ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Discount>(&sql)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Discount>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{DISCOUNT_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, Discount>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: DiscountCreate) -> RepoResult<Discount> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO discount (id, name, percentage, starts_at, ends_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.percentage)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create discount".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiscountUpdate) -> RepoResult<Discount> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE discount SET name = COALESCE(?1, name), percentage = COALESCE(?2, percentage), starts_at = COALESCE(?3, starts_at), ends_at = COALESCE(?4, ends_at), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.percentage)
    .bind(data.starts_at)
    .bind(data.ends_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Discount {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id}")))
}

/// Delete a discount and its assignments (historical order lines keep
/// their frozen prices — they do not reference the discount at all)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM menu_discount WHERE discount_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM discount WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

// =============================================================================
// Assignments
// =============================================================================

/// Assign a discount to a set of menus (replace-then-insert, so
/// re-assigning the same menus is idempotent)
pub async fn assign(pool: &SqlitePool, discount_id: i64, menu_ids: &[i64]) -> RepoResult<()> {
    if menu_ids.is_empty() {
        return Ok(());
    }
    let mut tx = pool.begin().await?;
    for menu_id in menu_ids {
        sqlx::query("DELETE FROM menu_discount WHERE discount_id = ? AND menu_id = ?")
            .bind(discount_id)
            .bind(menu_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO menu_discount (menu_id, discount_id) VALUES (?1, ?2)")
            .bind(menu_id)
            .bind(discount_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Remove a discount from a set of menus
pub async fn remove(pool: &SqlitePool, discount_id: i64, menu_ids: &[i64]) -> RepoResult<()> {
    if menu_ids.is_empty() {
        return Ok(());
    }
    let placeholders = vec!["?"; menu_ids.len()].join(", ");
    let sql =
        format!("DELETE FROM menu_discount WHERE discount_id = ? AND menu_id IN ({placeholders})");
    let mut query = sqlx::query(&sql).bind(discount_id);
    for menu_id in menu_ids {
        query = query.bind(menu_id);
    }
    query.execute(pool).await?;
    Ok(())
}

/// Assignment pairs for a set of menus (pricing catalog load)
pub async fn find_assignments_for_menus(
    pool: &SqlitePool,
    menu_ids: &[i64],
) -> RepoResult<Vec<MenuDiscount>> {
    if menu_ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; menu_ids.len()].join(", ");
    let sql = format!(
        "SELECT menu_id, discount_id FROM menu_discount WHERE menu_id IN ({placeholders})"
    );
    let mut query = sqlx::query_as::<_, MenuDiscount>(&sql);
    for id in menu_ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Distinct discounts assigned to any of the given menus
pub async fn find_assigned_discounts_for_menus(
    pool: &SqlitePool,
    menu_ids: &[i64],
) -> RepoResult<Vec<Discount>> {
    if menu_ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; menu_ids.len()].join(", ");
    let sql = format!(
        "SELECT DISTINCT d.id, d.name, d.percentage, d.starts_at, d.ends_at, d.created_at, d.updated_at \
         FROM discount d JOIN menu_discount md ON md.discount_id = d.id \
         WHERE md.menu_id IN ({placeholders})"
    );
    let mut query = sqlx::query_as::<_, Discount>(&sql);
    for id in menu_ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Menu items a discount is assigned to (admin detail views)
pub async fn find_menus_for_discount(
    pool: &SqlitePool,
    discount_id: i64,
) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItem>(
        "SELECT m.id, m.vendor_id, m.name, m.price, m.category, m.photo, m.description, m.created_at, m.updated_at \
         FROM menu_item m JOIN menu_discount md ON md.menu_id = m.id \
         WHERE md.discount_id = ? ORDER BY m.created_at DESC",
    )
    .bind(discount_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
