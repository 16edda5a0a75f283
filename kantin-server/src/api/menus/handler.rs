//! Menu API Handlers
//!
//! Public listings return the priced projection — computed with the same
//! selector and rounding as checkout, so the displayed price always
//! matches what an order line would freeze at.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{discount, menu};
use crate::orders::require_own_vendor;
use crate::pricing::{AssignmentSet, price_menu};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text, validate_price, validate_required_text,
};
use shared::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate, MenuPriced};

/// Filters for the public menu listing
#[derive(Debug, Deserialize)]
pub struct MenuListQuery {
    pub category: Option<MenuCategory>,
    pub vendor_id: Option<i64>,
}

/// GET /api/menus - 获取所有菜单 (公开, 含折扣价)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuListQuery>,
) -> AppResult<Json<Vec<MenuPriced>>> {
    let menus = menu::find_all(&state.pool, query.category, query.vendor_id).await?;
    let priced = priced_projection(&state, menus).await?;
    Ok(Json(priced))
}

/// GET /api/menus/:id - 获取单个菜单 (公开, 含折扣价)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuPriced>> {
    let found = menu::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id}")))?;

    let mut priced = priced_projection(&state, vec![found]).await?;
    Ok(Json(priced.remove(0)))
}

/// GET /api/menus/mine - 本档口的菜单 (管理员)
pub async fn list_mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<MenuItem>>> {
    let vendor = require_own_vendor(&state.pool, &current_user).await?;
    let menus = menu::find_by_vendor(&state.pool, vendor.id).await?;
    Ok(Json(menus))
}

/// POST /api/menus - 创建菜单项 (管理员, 归属本档口)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    let vendor = require_own_vendor(&state.pool, &current_user).await?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    validate_price(payload.price)?;

    let created = menu::create(&state.pool, vendor.id, payload).await?;

    tracing::info!(menu_id = created.id, vendor_id = vendor.id, "Menu item created");

    Ok(Json(created))
}

/// PUT /api/menus/:id - 更新菜单项 (仅本档口)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    require_menu_ownership(&state, &current_user, id).await?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let updated = menu::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/menus/:id - 删除菜单项 (仅本档口)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    require_menu_ownership(&state, &current_user, id).await?;
    let deleted = menu::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}

/// Price a batch of menus with their best active discounts
async fn priced_projection(
    state: &ServerState,
    menus: Vec<MenuItem>,
) -> AppResult<Vec<MenuPriced>> {
    let menu_ids: Vec<i64> = menus.iter().map(|m| m.id).collect();
    let assignments: AssignmentSet =
        discount::find_assignments_for_menus(&state.pool, &menu_ids)
            .await?
            .into_iter()
            .map(|a| (a.menu_id, a.discount_id))
            .collect();
    let discounts = discount::find_assigned_discounts_for_menus(&state.pool, &menu_ids).await?;

    let now = shared::util::now_millis();
    Ok(menus
        .iter()
        .map(|m| price_menu(m, now, &discounts, &assignments))
        .collect())
}

/// 校验菜单项归属当前管理员的档口
async fn require_menu_ownership(
    state: &ServerState,
    current_user: &CurrentUser,
    menu_id: i64,
) -> AppResult<()> {
    let vendor = require_own_vendor(&state.pool, current_user).await?;

    let found = menu::find_by_id(&state.pool, menu_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {menu_id}")))?;

    if found.vendor_id != vendor.id {
        return Err(AppError::forbidden(
            "This menu item does not belong to your vendor",
        ));
    }
    Ok(())
}
