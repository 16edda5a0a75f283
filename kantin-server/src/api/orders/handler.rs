//! Student Order API Handlers

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
use shared::models::{MonthlyHistory, OrderCreate, OrderDetail, OrderStatus, Receipt};

#[derive(Debug, Deserialize)]
pub struct MyOrdersQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// POST /api/orders - 学生下单 (结账)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::create_order(&state.pool, &current_user, payload).await?;
    Ok(Json(detail))
}

/// GET /api/orders - 我的订单 (可按状态过滤)
pub async fn list_mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<MyOrdersQuery>,
) -> AppResult<Json<Vec<OrderDetail>>> {
    let profile = orders::require_student_profile(&state.pool, &current_user).await?;
    let found = order::find_by_student(&state.pool, profile.id, query.status, None).await?;
    let details = orders::order_details(&state.pool, found).await?;
    Ok(Json(details))
}

/// GET /api/orders/history - 按月订单历史
pub async fn history(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<MonthlyHistory>> {
    let profile = orders::require_student_profile(&state.pool, &current_user).await?;

    // Default to the current month/year if not provided
    let today = chrono::Utc::now();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());

    let range = orders::month_range(year, month)?;
    let found = order::find_by_student(&state.pool, profile.id, None, Some(range)).await?;
    let details = orders::order_details(&state.pool, found).await?;

    let total_spent = details.iter().map(|d| d.total_price).sum();

    Ok(Json(MonthlyHistory {
        month,
        year,
        order_count: details.len(),
        total_spent,
        orders: details,
    }))
}

/// GET /api/orders/:id - 订单详情 (仅本人)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let found = require_own_order(&state, &current_user, id).await?;
    let detail = orders::order_detail(&state.pool, &found, None, None).await?;
    Ok(Json(detail))
}

/// GET /api/orders/:id/receipt - 订单小票数据 (仅本人)
pub async fn receipt(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Receipt>> {
    let found = require_own_order(&state, &current_user, id).await?;
    let receipt = orders::receipt(&state.pool, &found).await?;
    Ok(Json(receipt))
}

/// 加载订单并校验归属当前学生
async fn require_own_order(
    state: &ServerState,
    current_user: &CurrentUser,
    order_id: i64,
) -> AppResult<shared::models::Order> {
    let profile = orders::require_student_profile(&state.pool, current_user).await?;

    let found = order::find_by_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    if found.student_id != profile.id {
        return Err(AppError::forbidden("You may only view your own orders"));
    }
    Ok(found)
}
