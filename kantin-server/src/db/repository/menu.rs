//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use sqlx::SqlitePool;

const MENU_SELECT: &str = "SELECT id, vendor_id, name, price, category, photo, description, created_at, updated_at FROM menu_item";

/// List menu items, optionally filtered by category and/or vendor
pub async fn find_all(
    pool: &SqlitePool,
    category: Option<MenuCategory>,
    vendor_id: Option<i64>,
) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "{MENU_SELECT} WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR vendor_id = ?2) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(category)
        .bind(vendor_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("{MENU_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_vendor(pool: &SqlitePool, vendor_id: i64) -> RepoResult<Vec<MenuItem>> {
    let sql = format!("{MENU_SELECT} WHERE vendor_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(vendor_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Load a set of menu items by id (order-creation / assignment checks)
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{MENU_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, MenuItem>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, vendor_id: i64, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO menu_item (id, vendor_id, name, price, category, photo, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(vendor_id)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.category)
    .bind(&data.photo)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_item SET name = COALESCE(?1, name), price = COALESCE(?2, price), category = COALESCE(?3, category), photo = COALESCE(?4, photo), description = COALESCE(?5, description), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.category)
    .bind(&data.photo)
    .bind(&data.description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
