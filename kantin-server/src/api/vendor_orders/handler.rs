//! Vendor Order API Handlers
//!
//! Vendor-side order management: listing, status transitions and the
//! monthly income recap. All routes require the admin to own the vendor.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Datelike;
use serde::Deserialize;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders;
use crate::utils::AppResult;
use shared::models::{MonthlyRecap, OrderDetail, OrderStatus, OrderStatusUpdate};

#[derive(Debug, Deserialize)]
pub struct VendorOrdersQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RecapQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// GET /api/vendor/orders - 本档口订单 (可按月份/状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<VendorOrdersQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let vendor = orders::require_own_vendor(&state.pool, &current_user).await?;

    let range = match (query.month, query.year) {
        (Some(month), Some(year)) => Some(orders::month_range(year, month)?),
        _ => None,
    };

    let found = order::find_by_vendor(&state.pool, vendor.id, query.status, range).await?;
    let details = orders::order_details(&state.pool, found).await?;
    Ok(Json(details))
}

/// GET /api/vendor/orders/:id - 本档口单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let vendor = orders::require_own_vendor(&state.pool, &current_user).await?;

    let found = order::find_by_id(&state.pool, id)
        .await?
        .filter(|o| o.vendor_id == vendor.id)
        .ok_or_else(|| AppError::not_found(format!("Order {id} for your vendor")))?;

    let detail = orders::order_detail(&state.pool, &found, Some(&vendor), None).await?;
    Ok(Json(detail))
}

/// PUT /api/vendor/orders/:id/status - 更新订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::update_status(
        &state.pool,
        state.config.status_policy,
        &current_user,
        id,
        payload.status,
    )
    .await?;
    Ok(Json(detail))
}

/// GET /api/vendor/orders/recap/monthly - 月度营收汇总
pub async fn monthly_recap(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<RecapQuery>,
) -> AppResult<Json<MonthlyRecap>> {
    let vendor = orders::require_own_vendor(&state.pool, &current_user).await?;

    // Default to the current month/year if not provided
    let today = chrono::Utc::now();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());

    let recap = orders::monthly_recap(&state.pool, &vendor, year, month).await?;
    Ok(Json(recap))
}
