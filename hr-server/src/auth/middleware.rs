//! 认证中间件
//!
//! 为 JWT 认证提供 Axum 中间件。

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository;
use crate::security_log;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证访问令牌，然后按用户 ID
/// 重新加载账号：令牌指向已删除的用户 → 401，停用的用户 → 403。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health` 等)
/// - `/api/auth/login`, `/api/auth/refresh` (登录/续签)
/// - `/api/webhooks/*` (共享密钥校验，见 webhooks 模块)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 刷新令牌冒充 | 401 InvalidToken |
/// | 用户已删除 | 401 Unauthorized |
/// | 用户已停用 | 403 AccountDisabled |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证
    let is_public_api_route = path == "/api/auth/login"
        || path == "/api/auth/refresh"
        || path.starts_with("/api/webhooks/");
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    let claims = match state.get_jwt_service().validate_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    // 按令牌 subject 重新加载账号
    let user_id = claims
        .user_id()
        .map_err(|_| AppError::invalid_token("Invalid token"))?;
    let user = repository::user::find_by_id(state.get_db().pool(), user_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let user = match user {
        Some(u) => u,
        None => {
            security_log!("WARN", "auth_user_deleted", user_id = user_id);
            return Err(AppError::with_message(
                shared::ErrorCode::NotAuthenticated,
                "User not found",
            ));
        }
    };

    if !user.is_active {
        security_log!("WARN", "auth_user_disabled", user_id = user_id);
        return Err(AppError::account_disabled());
    }

    req.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(req).await)
}

/// CurrentUser extractor for protected handlers
///
/// The auth middleware always runs first on `/api/` routes, so this only
/// reads the request extensions.
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}
