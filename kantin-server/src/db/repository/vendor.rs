//! Vendor Repository

use super::{RepoError, RepoResult};
use shared::models::{Vendor, VendorCreate, VendorUpdate};
use sqlx::SqlitePool;

const VENDOR_SELECT: &str =
    "SELECT id, name, owner_name, phone, user_id, created_at, updated_at FROM vendor";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Vendor>> {
    let sql = format!("{VENDOR_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Vendor>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Vendor>> {
    let sql = format!("{VENDOR_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Vendor>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find the vendor owned by an admin account (one per account)
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Vendor>> {
    let sql = format!("{VENDOR_SELECT} WHERE user_id = ?");
    let row = sqlx::query_as::<_, Vendor>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: VendorCreate) -> RepoResult<Vendor> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO vendor (id, name, owner_name, phone, user_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.owner_name)
    .bind(&data.phone)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create vendor".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: VendorUpdate) -> RepoResult<Vendor> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE vendor SET name = COALESCE(?1, name), owner_name = COALESCE(?2, owner_name), phone = COALESCE(?3, phone), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.owner_name)
    .bind(&data.phone)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Vendor {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Vendor {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM vendor WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
