//! Order Repository
//!
//! The order row and all its lines are written in one transaction: a
//! checkout either lands completely or not at all, and no partial order
//! is ever visible to other readers.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderLine, OrderLineDetail, OrderLineNew, OrderStatus};
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, vendor_id, student_id, status, created_at FROM orders";

/// Insert an order plus all of its lines atomically
pub async fn create_with_lines(
    pool: &SqlitePool,
    vendor_id: i64,
    student_id: i64,
    lines: &[OrderLineNew],
) -> RepoResult<Order> {
    let order_id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, vendor_id, student_id, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(order_id)
    .bind(vendor_id)
    .bind(student_id)
    .bind(OrderStatus::Unconfirmed)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in lines {
        sqlx::query(
            "INSERT INTO order_line (id, order_id, menu_id, qty, unit_price) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(line.menu_id)
        .bind(line.qty)
        .bind(line.unit_price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Order {
        id: order_id,
        vendor_id,
        student_id,
        status: OrderStatus::Unconfirmed,
        created_at: now,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_lines(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let rows = sqlx::query_as::<_, OrderLine>(
        "SELECT id, order_id, menu_id, qty, unit_price FROM order_line WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lines of an order joined with menu info; subtotal computed from the
/// frozen unit price
pub async fn find_line_details(
    pool: &SqlitePool,
    order_id: i64,
) -> RepoResult<Vec<OrderLineDetail>> {
    let rows = sqlx::query_as::<_, OrderLineDetail>(
        "SELECT ol.menu_id, m.name AS menu_name, m.category, ol.qty, ol.unit_price, ol.unit_price * ol.qty AS subtotal \
         FROM order_line ol JOIN menu_item m ON m.id = ol.menu_id \
         WHERE ol.order_id = ?",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Orders of one student, optionally filtered by status and/or a
/// `[start, end)` creation range (millis)
pub async fn find_by_student(
    pool: &SqlitePool,
    student_id: i64,
    status: Option<OrderStatus>,
    range: Option<(i64, i64)>,
) -> RepoResult<Vec<Order>> {
    let (start, end) = match range {
        Some((s, e)) => (Some(s), Some(e)),
        None => (None, None),
    };
    let sql = format!(
        "{ORDER_SELECT} WHERE student_id = ?1 AND (?2 IS NULL OR status = ?2) \
         AND (?3 IS NULL OR created_at >= ?3) AND (?4 IS NULL OR created_at < ?4) \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(student_id)
        .bind(status)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Orders of one vendor, optionally filtered by status and/or a
/// `[start, end)` creation range (millis)
pub async fn find_by_vendor(
    pool: &SqlitePool,
    vendor_id: i64,
    status: Option<OrderStatus>,
    range: Option<(i64, i64)>,
) -> RepoResult<Vec<Order>> {
    let (start, end) = match range {
        Some((s, e)) => (Some(s), Some(e)),
        None => (None, None),
    };
    let sql = format!(
        "{ORDER_SELECT} WHERE vendor_id = ?1 AND (?2 IS NULL OR status = ?2) \
         AND (?3 IS NULL OR created_at >= ?3) AND (?4 IS NULL OR created_at < ?4) \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(vendor_id)
        .bind(status)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))
}
