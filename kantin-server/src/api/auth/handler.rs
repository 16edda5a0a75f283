//! Authentication Handlers
//!
//! Handles registration, login and current-user lookup

use std::time::Duration;

use axum::{Json, extract::State};

use crate::AppError;
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::AppResult;
use crate::utils::validation::{validate_password, validate_username};
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/register - 注册账号
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<UserInfo>> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;

    if user::find_by_username(&state.pool, &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Username {} already exists",
            req.username
        )));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let created = user::create(&state.pool, &req.username, &password_hash, req.role).await?;

    tracing::info!(
        user_id = created.id,
        username = %created.username,
        role = %created.role,
        "User registered"
    );

    Ok(Json(created.into()))
}

/// POST /api/auth/login - 登录
///
/// Authenticates credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let account = match found {
        Some(u) => {
            let password_valid = verify_password(&req.password, &u.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(username = %req.username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(username = %req.username, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(account.id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    // Query fresh data; the account may have changed since token issue
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;

    Ok(Json(account.into()))
}
