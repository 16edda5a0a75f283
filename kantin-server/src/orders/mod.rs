//! 订单领域模块
//!
//! Order aggregation and lifecycle:
//!
//! - [`create_order`] - checkout: price every line against one catalog
//!   snapshot, then persist order + lines atomically
//! - [`update_status`] - vendor-side status transition under the
//!   configured [`StatusPolicy`]
//! - read-side assembly of [`OrderDetail`] with totals derived from the
//!   frozen line prices on every fetch

mod status;

pub use status::StatusPolicy;

use std::collections::HashMap;

use sqlx::SqlitePool;

use shared::models::{
    MonthlyRecap, Order, OrderCreate, OrderDetail, OrderLineNew, OrderStatus, Receipt, Student,
    Vendor,
};

use crate::auth::CurrentUser;
use crate::db::repository::{discount, menu, order, student, vendor};
use crate::pricing::{PricingCatalog, resolve_line_price};
use crate::utils::{AppError, AppResult};

/// Create an order from a student checkout request.
///
/// All lines are priced against one catalog snapshot and one `now`; the
/// first failing line aborts the whole request and nothing is persisted.
/// A missing student profile is provisioned on the fly (name defaulted
/// from the username) — guarded by the unique user link, so concurrent
/// first checkouts still end up with exactly one profile.
pub async fn create_order(
    pool: &SqlitePool,
    user: &CurrentUser,
    req: OrderCreate,
) -> AppResult<OrderDetail> {
    user.require_student()?;

    if req.lines.is_empty() {
        return Err(AppError::validation("Order must contain at least 1 line"));
    }

    let vendor = vendor::find_by_id(pool, req.vendor_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {}", req.vendor_id)))?;

    let student = student::get_or_create_for_user(pool, user.id, &user.username).await?;

    // Load the pricing catalog for exactly the menus this request touches
    let mut menu_ids: Vec<i64> = req.lines.iter().map(|l| l.menu_id).collect();
    menu_ids.sort_unstable();
    menu_ids.dedup();

    let menus = menu::find_by_ids(pool, &menu_ids).await?;
    let assignments = discount::find_assignments_for_menus(pool, &menu_ids).await?;
    let mut discounts = discount::find_assigned_discounts_for_menus(pool, &menu_ids).await?;

    // Explicitly requested discounts may not be assigned (or may not
    // exist) — load them too so the resolver can tell those cases apart
    let extra_ids: Vec<i64> = req
        .lines
        .iter()
        .filter_map(|l| l.discount_id)
        .filter(|id| !discounts.iter().any(|d| d.id == *id))
        .collect();
    discounts.extend(discount::find_by_ids(pool, &extra_ids).await?);

    let catalog = PricingCatalog::new(menus, discounts, assignments);
    let now = shared::util::now_millis();

    let mut new_lines = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        let resolved = resolve_line_price(&catalog, vendor.id, line, now)?;
        new_lines.push(OrderLineNew {
            menu_id: resolved.menu_id,
            qty: resolved.qty,
            unit_price: resolved.unit_price,
        });
    }

    let created = order::create_with_lines(pool, vendor.id, student.id, &new_lines).await?;

    tracing::info!(
        order_id = created.id,
        vendor_id = vendor.id,
        student_id = student.id,
        lines = new_lines.len(),
        "Order created"
    );

    order_detail(pool, &created, Some(&vendor), Some(&student)).await
}

/// Transition an order's status (vendor admin of the owning vendor only)
pub async fn update_status(
    pool: &SqlitePool,
    policy: StatusPolicy,
    user: &CurrentUser,
    order_id: i64,
    new_status: OrderStatus,
) -> AppResult<OrderDetail> {
    let vendor = require_own_vendor(pool, user).await?;

    let existing = order::find_by_id(pool, order_id)
        .await?
        .filter(|o| o.vendor_id == vendor.id)
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} for your vendor")))?;

    if !policy.allows(existing.status, new_status) {
        return Err(AppError::business_rule(format!(
            "Status transition {} -> {} is not allowed",
            existing.status, new_status
        )));
    }

    let updated = order::update_status(pool, order_id, new_status).await?;

    tracing::info!(
        order_id,
        from = %existing.status,
        to = %new_status,
        "Order status updated"
    );

    order_detail(pool, &updated, Some(&vendor), None).await
}

/// The vendor owned by the calling admin account
pub async fn require_own_vendor(pool: &SqlitePool, user: &CurrentUser) -> AppResult<Vendor> {
    user.require_vendor_admin()?;
    vendor::find_by_user(pool, user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Vendor for this account".to_string()))
}

/// The profile of the calling student (provisioned if missing)
pub async fn require_student_profile(pool: &SqlitePool, user: &CurrentUser) -> AppResult<Student> {
    user.require_student()?;
    Ok(student::get_or_create_for_user(pool, user.id, &user.username).await?)
}

// =============================================================================
// Read-side assembly
// =============================================================================

/// Assemble the full order view; the total is recomputed from the frozen
/// line prices on every call
pub async fn order_detail(
    pool: &SqlitePool,
    order: &Order,
    vendor_hint: Option<&Vendor>,
    student_hint: Option<&Student>,
) -> AppResult<OrderDetail> {
    let vendor_name = match vendor_hint {
        Some(v) => v.name.clone(),
        None => vendor::find_by_id(pool, order.vendor_id)
            .await?
            .map(|v| v.name)
            .unwrap_or_default(),
    };
    let student_name = match student_hint {
        Some(s) => s.name.clone(),
        None => student::find_by_id(pool, order.student_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_default(),
    };

    let lines = order::find_line_details(pool, order.id).await?;
    let total_price = lines.iter().map(|l| l.subtotal).sum();

    Ok(OrderDetail {
        id: order.id,
        vendor_id: order.vendor_id,
        vendor_name,
        student_id: order.student_id,
        student_name,
        status: order.status,
        created_at: order.created_at,
        lines,
        total_price,
    })
}

/// Assemble details for a batch of orders (list endpoints), caching
/// vendor/student names across the batch
pub async fn order_details(pool: &SqlitePool, orders: Vec<Order>) -> AppResult<Vec<OrderDetail>> {
    let mut vendor_names: HashMap<i64, String> = HashMap::new();
    let mut student_names: HashMap<i64, String> = HashMap::new();
    let mut details = Vec::with_capacity(orders.len());

    for o in orders {
        if !vendor_names.contains_key(&o.vendor_id) {
            let name = vendor::find_by_id(pool, o.vendor_id)
                .await?
                .map(|v| v.name)
                .unwrap_or_default();
            vendor_names.insert(o.vendor_id, name);
        }
        if !student_names.contains_key(&o.student_id) {
            let name = student::find_by_id(pool, o.student_id)
                .await?
                .map(|s| s.name)
                .unwrap_or_default();
            student_names.insert(o.student_id, name);
        }

        let lines = order::find_line_details(pool, o.id).await?;
        let total_price = lines.iter().map(|l| l.subtotal).sum();

        details.push(OrderDetail {
            id: o.id,
            vendor_id: o.vendor_id,
            vendor_name: vendor_names[&o.vendor_id].clone(),
            student_id: o.student_id,
            student_name: student_names[&o.student_id].clone(),
            status: o.status,
            created_at: o.created_at,
            lines,
            total_price,
        })
    }

    Ok(details)
}

/// Receipt projection for one order (student side)
pub async fn receipt(pool: &SqlitePool, order: &Order) -> AppResult<Receipt> {
    let vendor = vendor::find_by_id(pool, order.vendor_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {}", order.vendor_id)))?;
    let student = student::find_by_id(pool, order.student_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Student {}", order.student_id)))?;

    let items = order::find_line_details(pool, order.id).await?;
    let total_price = items.iter().map(|l| l.subtotal).sum();

    Ok(Receipt {
        order_id: order.id,
        created_at: order.created_at,
        status: order.status,
        vendor_name: vendor.name,
        vendor_owner: vendor.owner_name,
        vendor_phone: vendor.phone,
        buyer_name: student.name,
        buyer_address: student.address,
        buyer_phone: student.phone,
        items,
        total_price,
    })
}

/// Monthly income recap for a vendor
pub async fn monthly_recap(
    pool: &SqlitePool,
    vendor: &Vendor,
    year: i32,
    month: u32,
) -> AppResult<MonthlyRecap> {
    let range = month_range(year, month)?;
    let orders = order::find_by_vendor(pool, vendor.id, None, Some(range)).await?;

    let mut recap = MonthlyRecap {
        month,
        year,
        vendor_name: vendor.name.clone(),
        total_orders: orders.len(),
        total_income: 0,
        unconfirmed: 0,
        cooking: 0,
        delivering: 0,
        arrived: 0,
    };

    for o in &orders {
        let lines = order::find_line_details(pool, o.id).await?;
        recap.total_income += lines.iter().map(|l| l.subtotal).sum::<i64>();
        match o.status {
            OrderStatus::Unconfirmed => recap.unconfirmed += 1,
            OrderStatus::Cooking => recap.cooking += 1,
            OrderStatus::Delivering => recap.delivering += 1,
            OrderStatus::Arrived => recap.arrived += 1,
        }
    }

    Ok(recap)
}

/// `[start, end)` millis range of a calendar month (UTC)
pub fn month_range(year: i32, month: u32) -> AppResult<(i64, i64)> {
    use chrono::NaiveDate;

    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {year}-{month}")))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::validation(format!("Invalid month: {year}-{month}")))?;

    let to_millis = |d: NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or(0)
    };

    Ok((to_millis(start), to_millis(end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_range_covers_whole_month() {
        let (start, end) = month_range(2025, 1).unwrap();
        let (feb_start, _) = month_range(2025, 2).unwrap();
        assert_eq!(end, feb_start);
        // 31 days
        assert_eq!(end - start, 31 * 24 * 3600 * 1000);
    }

    #[test]
    fn test_month_range_december_rolls_over() {
        let (_, end) = month_range(2024, 12).unwrap();
        let (jan_start, _) = month_range(2025, 1).unwrap();
        assert_eq!(end, jan_start);
    }

    #[test]
    fn test_month_range_rejects_bad_month() {
        assert!(month_range(2025, 0).is_err());
        assert!(month_range(2025, 13).is_err());
    }
}
