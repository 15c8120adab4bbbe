//! Authentication Handlers
//!
//! Login, token refresh and password management.

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::AppError;
use crate::auth::jwt::JwtError;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository;
use crate::security_log;
use crate::utils::AppResult;
use crate::utils::validation::validate_password;
use shared::models::{AccessTokenResponse, LoginRequest, LoginResponse, PasswordChange,
    RefreshRequest, UserPublic};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Serialize)]
pub struct MessageResponse {
    message: String,
}

/// POST /api/auth/login - 登录换取令牌对
///
/// Unknown email and wrong password share one error message to prevent
/// account enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let pool = state.get_db().pool();
    let user = repository::user::find_by_email(pool, &req.email)
        .await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(user) = user else {
        security_log!("WARN", "login_failed", email = req.email.clone(), reason = "unknown_email");
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidCredentials,
            "Incorrect email or password",
        ));
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        security_log!("WARN", "login_failed", email = req.email.clone(), reason = "bad_password");
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidCredentials,
            "Incorrect email or password",
        ));
    }

    if !user.is_active {
        security_log!("WARN", "login_failed", email = req.email.clone(), reason = "inactive");
        return Err(AppError::with_message(
            shared::ErrorCode::AccountDisabled,
            "User account is inactive",
        ));
    }

    let jwt = state.get_jwt_service();
    let access = jwt.generate_access_token(user.id, user.role)?;
    let refresh = jwt.generate_refresh_token(user.id, user.role)?;

    security_log!("INFO", "login_success", user_id = user.id, role = user.role.as_str());

    Ok(Json(LoginResponse {
        access,
        refresh,
        token_type: "bearer".to_string(),
    }))
}

/// POST /api/auth/refresh - 用刷新令牌换新的访问令牌
///
/// The user row is re-checked so a deleted or deactivated account cannot
/// mint fresh access tokens, and the role is read from the database, not
/// from the old token.
pub async fn refresh(
    State(state): State<ServerState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    let jwt = state.get_jwt_service();
    let claims = jwt.validate_refresh_token(&req.refresh).map_err(|e| match e {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid refresh token"),
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::invalid_token("Invalid refresh token"))?;

    let user = repository::user::find_by_id(state.get_db().pool(), user_id)
        .await?;
    let user = match user {
        Some(u) if u.is_active => u,
        _ => {
            security_log!("WARN", "refresh_rejected", user_id = user_id);
            return Err(AppError::with_message(
                shared::ErrorCode::NotAuthenticated,
                "User not found or inactive",
            ));
        }
    };

    let access = jwt.generate_access_token(user.id, user.role)?;
    Ok(Json(AccessTokenResponse { access }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserPublic>> {
    let row = repository::user::find_by_id(state.get_db().pool(), user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(UserPublic::from(row)))
}

/// PUT /api/auth/users/{user_id}/password - 修改自己的密码
pub async fn change_password(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    user: CurrentUser,
    Json(req): Json<PasswordChange>,
) -> AppResult<Json<MessageResponse>> {
    if user.id != user_id {
        security_log!("WARN", "password_change_denied", user_id = user.id, target = user_id);
        return Err(AppError::forbidden(
            "Not authorized to change this password",
        ));
    }

    let pool = state.get_db().pool();
    let row = repository::user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if !password::verify_password(&req.old_password, &row.password_hash)? {
        return Err(AppError::validation("Incorrect old password"));
    }

    validate_password(&req.new_password)?;
    let new_hash = password::hash_password(&req.new_password)?;
    repository::user::update_password(pool, user_id, &new_hash)
        .await?;

    security_log!("INFO", "password_changed", user_id = user_id);

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}
