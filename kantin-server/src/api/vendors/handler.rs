//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::vendor;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use shared::models::{Vendor, VendorCreate, VendorUpdate};

/// GET /api/vendors - 获取所有档口 (公开)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Vendor>>> {
    let vendors = vendor::find_all(&state.pool).await?;
    Ok(Json(vendors))
}

/// GET /api/vendors/:id - 获取单个档口 (公开)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vendor>> {
    let found = vendor::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {id}")))?;
    Ok(Json(found))
}

/// POST /api/vendors - 创建档口 (每个管理员账号一个)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<VendorCreate>,
) -> AppResult<Json<Vendor>> {
    current_user.require_vendor_admin()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.owner_name, "owner_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    if vendor::find_by_user(&state.pool, current_user.id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(
            "This account already owns a vendor".to_string(),
        ));
    }

    let created = vendor::create(&state.pool, current_user.id, payload).await?;

    tracing::info!(vendor_id = created.id, user_id = current_user.id, "Vendor created");

    Ok(Json(created))
}

/// PUT /api/vendors/:id - 更新档口 (仅所有者)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<VendorUpdate>,
) -> AppResult<Json<Vendor>> {
    require_ownership(&state, &current_user, id).await?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.owner_name, "owner_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let updated = vendor::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/vendors/:id - 删除档口 (仅所有者)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    require_ownership(&state, &current_user, id).await?;
    let deleted = vendor::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}

/// 校验当前管理员是否拥有该档口
async fn require_ownership(
    state: &ServerState,
    current_user: &CurrentUser,
    vendor_id: i64,
) -> AppResult<()> {
    current_user.require_vendor_admin()?;

    let found = vendor::find_by_id(&state.pool, vendor_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Vendor {vendor_id}")))?;

    if found.user_id != current_user.id {
        return Err(AppError::forbidden(
            "You do not have access to this vendor",
        ));
    }
    Ok(())
}
