//! Student API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::auth::{CurrentUser, hash_password};
use crate::core::ServerState;
use crate::db::repository::{student, user};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_optional_text, validate_password,
    validate_required_text, validate_username,
};
use shared::models::{Role, Student, StudentCreate, StudentUpdate};

/// GET /api/students - 获取所有学生
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Student>>> {
    let students = student::find_all(&state.pool).await?;
    Ok(Json(students))
}

/// GET /api/students/:id - 获取单个学生
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Student>> {
    let found = student::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Student {id}")))?;
    Ok(Json(found))
}

/// POST /api/students - 创建学生及其登录账号 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<StudentCreate>,
) -> AppResult<Json<Student>> {
    current_user.require_vendor_admin()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.address, "address", MAX_TEXT_LEN)?;
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;

    if user::find_by_username(&state.pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Username {} already exists",
            payload.username
        )));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let account = user::create(&state.pool, &payload.username, &password_hash, Role::Student).await?;
    let created = student::create(
        &state.pool,
        account.id,
        &payload.name,
        &payload.address,
        &payload.phone,
        payload.photo.as_deref().unwrap_or(""),
    )
    .await?;

    tracing::info!(
        student_id = created.id,
        user_id = account.id,
        "Student and account created"
    );

    Ok(Json(created))
}

/// PUT /api/students/:id - 更新学生 (本人或管理员)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StudentUpdate>,
) -> AppResult<Json<Student>> {
    let existing = student::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Student {id}")))?;

    // Admins may edit anyone; a student may only edit their own profile
    if !current_user.is_vendor_admin() && existing.user_id != current_user.id {
        return Err(AppError::forbidden("You may only edit your own profile"));
    }

    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_TEXT_LEN)?;

    let updated = student::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/students/:id - 删除学生 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    current_user.require_vendor_admin()?;

    student::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Student {id}")))?;

    let deleted = student::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}
