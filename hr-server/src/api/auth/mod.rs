//! Authentication Routes

mod handler;

use axum::{Router, routing::get, routing::post, routing::put};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/login, /api/auth/refresh: public (no auth required)
/// - /api/auth/me, password change: protected by the global require_auth middleware
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/me", get(handler::me))
        .route(
            "/api/auth/users/{user_id}/password",
            put(handler::change_password),
        )
}
