//! Student Repository

use super::{RepoError, RepoResult};
use shared::models::{Student, StudentUpdate};
use sqlx::SqlitePool;

const STUDENT_SELECT: &str =
    "SELECT id, name, address, phone, photo, user_id, created_at, updated_at FROM student";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Student>> {
    let sql = format!("{STUDENT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Student>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Student>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Student>> {
    let sql = format!("{STUDENT_SELECT} WHERE user_id = ?");
    let row = sqlx::query_as::<_, Student>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    address: &str,
    phone: &str,
    photo: &str,
) -> RepoResult<Student> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO student (id, name, address, phone, photo, user_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(name)
    .bind(address)
    .bind(phone)
    .bind(photo)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create student".into()))
}

/// Get the profile for an account, provisioning a minimal one if absent.
///
/// The insert is conflict-tolerant: under concurrent first checkouts the
/// loser's `INSERT .. ON CONFLICT DO NOTHING` is a no-op and the
/// follow-up select returns the winner's row, so exactly one profile
/// exists per account.
pub async fn get_or_create_for_user(
    pool: &SqlitePool,
    user_id: i64,
    default_name: &str,
) -> RepoResult<Student> {
    if let Some(existing) = find_by_user(pool, user_id).await? {
        return Ok(existing);
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO student (id, name, address, phone, photo, user_id, created_at, updated_at) \
         VALUES (?1, ?2, '', '', '', ?3, ?4, ?4) \
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(id)
    .bind(default_name)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to provision student profile".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: StudentUpdate) -> RepoResult<Student> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE student SET name = COALESCE(?1, name), address = COALESCE(?2, address), phone = COALESCE(?3, phone), photo = COALESCE(?4, photo), updated_at = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.photo)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Student {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Student {id}")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM student WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
