//! Inbound Webhook API Module
//!
//! 对外集成回调。不走 bearer token, 由共享密钥 (X-API-Key) 保护,
//! 认证中间件对 /api/webhooks/* 直接放行。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Webhook router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/webhooks", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/payroll-status", post(handler::payroll_status))
        .route("/calendar-sync", post(handler::calendar_sync))
        .route("/external-event", post(handler::external_event))
}
