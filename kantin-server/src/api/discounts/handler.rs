//! Discount API Handlers
//!
//! Discounts are global entities; assignment to menu items is what makes
//! them effective, and admins may only manage assignments over their own
//! vendor's menus.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{discount, menu};
use crate::orders::require_own_vendor;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_percentage, validate_required_text, validate_window,
};
use shared::models::{
    Discount, DiscountAssign, DiscountCreate, DiscountPerMenuCreate, DiscountUpdate,
    DiscountWithMenus,
};

/// GET /api/discounts - 获取所有折扣 (含已指派菜单)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiscountWithMenus>>> {
    let discounts = discount::find_all(&state.pool).await?;
    with_menus(&state, discounts).await.map(Json)
}

/// GET /api/discounts/active - 当前有效的折扣
pub async fn list_active(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<DiscountWithMenus>>> {
    let now = shared::util::now_millis();
    let discounts = discount::find_active(&state.pool, now).await?;
    with_menus(&state, discounts).await.map(Json)
}

/// GET /api/discounts/:id - 获取单个折扣
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiscountWithMenus>> {
    let found = discount::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount {id}")))?;
    let menus = discount::find_menus_for_discount(&state.pool, id).await?;
    Ok(Json(DiscountWithMenus {
        discount: found,
        menus,
    }))
}

/// POST /api/discounts - 创建折扣 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<DiscountCreate>,
) -> AppResult<Json<Discount>> {
    current_user.require_vendor_admin()?;
    validate_discount_payload(&payload)?;

    let created = discount::create(&state.pool, payload).await?;

    tracing::info!(
        discount_id = created.id,
        percentage = created.percentage,
        "Discount created"
    );

    Ok(Json(created))
}

/// POST /api/discounts/per-menu - 创建折扣并指派到本档口菜单
pub async fn create_per_menu(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<DiscountPerMenuCreate>,
) -> AppResult<Json<DiscountWithMenus>> {
    let vendor = require_own_vendor(&state.pool, &current_user).await?;
    let create = DiscountCreate {
        name: payload.name,
        percentage: payload.percentage,
        starts_at: payload.starts_at,
        ends_at: payload.ends_at,
    };
    validate_discount_payload(&create)?;
    if payload.menu_ids.is_empty() {
        return Err(AppError::validation("menu_ids must not be empty"));
    }
    require_menus_of_vendor(&state, vendor.id, &payload.menu_ids).await?;

    let created = discount::create(&state.pool, create).await?;
    discount::assign(&state.pool, created.id, &payload.menu_ids).await?;

    let menus = discount::find_menus_for_discount(&state.pool, created.id).await?;
    Ok(Json(DiscountWithMenus {
        discount: created,
        menus,
    }))
}

/// PUT /api/discounts/:id - 更新折扣
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountUpdate>,
) -> AppResult<Json<Discount>> {
    current_user.require_vendor_admin()?;

    let existing = discount::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount {id}")))?;

    if let Some(p) = payload.percentage {
        validate_percentage(p)?;
    }
    // The window must stay ordered after partial updates
    let starts_at = payload.starts_at.unwrap_or(existing.starts_at);
    let ends_at = payload.ends_at.unwrap_or(existing.ends_at);
    validate_window(starts_at, ends_at)?;

    let updated = discount::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/discounts/:id - 删除折扣
///
/// Removes the discount and its assignments. Order lines priced with it
/// keep their frozen unit prices.
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    current_user.require_vendor_admin()?;

    discount::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount {id}")))?;

    let deleted = discount::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}

/// POST /api/discounts/:id/assign - 指派折扣到本档口菜单
pub async fn assign(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountAssign>,
) -> AppResult<Json<DiscountWithMenus>> {
    let vendor = require_own_vendor(&state.pool, &current_user).await?;

    let found = discount::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount {id}")))?;

    if payload.menu_ids.is_empty() {
        return Err(AppError::validation("menu_ids must not be empty"));
    }
    require_menus_of_vendor(&state, vendor.id, &payload.menu_ids).await?;

    discount::assign(&state.pool, id, &payload.menu_ids).await?;

    let menus = discount::find_menus_for_discount(&state.pool, id).await?;
    Ok(Json(DiscountWithMenus {
        discount: found,
        menus,
    }))
}

/// POST /api/discounts/:id/remove - 从本档口菜单移除折扣
pub async fn remove(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountAssign>,
) -> AppResult<Json<DiscountWithMenus>> {
    let vendor = require_own_vendor(&state.pool, &current_user).await?;

    let found = discount::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount {id}")))?;

    require_menus_of_vendor(&state, vendor.id, &payload.menu_ids).await?;

    discount::remove(&state.pool, id, &payload.menu_ids).await?;

    let menus = discount::find_menus_for_discount(&state.pool, id).await?;
    Ok(Json(DiscountWithMenus {
        discount: found,
        menus,
    }))
}

fn validate_discount_payload(payload: &DiscountCreate) -> AppResult<()> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_percentage(payload.percentage)?;
    validate_window(payload.starts_at, payload.ends_at)?;
    Ok(())
}

/// 校验所有菜单都存在且归属该档口
async fn require_menus_of_vendor(
    state: &ServerState,
    vendor_id: i64,
    menu_ids: &[i64],
) -> AppResult<()> {
    let menus = menu::find_by_ids(&state.pool, menu_ids).await?;
    let all_owned = menus.len() == menu_ids.len() && menus.iter().all(|m| m.vendor_id == vendor_id);
    if !all_owned {
        return Err(AppError::forbidden(
            "Some menus do not belong to your vendor or do not exist",
        ));
    }
    Ok(())
}

/// Attach assigned menus to each discount (admin views)
async fn with_menus(
    state: &ServerState,
    discounts: Vec<Discount>,
) -> AppResult<Vec<DiscountWithMenus>> {
    let mut result = Vec::with_capacity(discounts.len());
    for d in discounts {
        let menus = discount::find_menus_for_discount(&state.pool, d.id).await?;
        result.push(DiscountWithMenus { discount: d, menus });
    }
    Ok(result)
}
