//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共路由)
//! - [`auth`] - 登录、续签、改密、当前用户
//! - [`employees`] - 员工档案和文档
//! - [`departments`] / [`positions`] - 组织结构
//! - [`leave`] - 假期类型、余额与审批流
//! - [`attendance`] - 打卡与考勤复核
//! - [`payroll`] - 工资批次、工资条和调薪台账
//! - [`performance`] - 绩效评审
//! - [`training`] - 培训课程与报名
//! - [`reports`] - 管理层报表与导出
//! - [`webhooks`] - 外部系统回调 (共享密钥)

pub mod auth;
pub mod health;

pub mod attendance;
pub mod departments;
pub mod employees;
pub mod leave;
pub mod payroll;
pub mod performance;
pub mod positions;
pub mod reports;
pub mod training;
pub mod webhooks;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Router, middleware as axum_middleware};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::ServerState;

/// Headroom on top of the configured file cap so multipart framing and
/// the text fields of an upload never trip the transport limit first.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// 并发上限。超出的请求在队列里等待, 不会被拒绝。
const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(employees::router())
        .merge(departments::router())
        .merge(positions::router())
        .merge(leave::router())
        .merge(attendance::router())
        .merge(payroll::router())
        .merge(performance::router())
        .merge(training::router())
        .merge(reports::router())
        .merge(webhooks::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    let body_limit = state.config.max_upload_size as usize + MULTIPART_OVERHEAD;
    build_router()
        // Body cap - sized for document uploads
        .layer(DefaultBodyLimit::max(body_limit))
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Request logging - outermost of the observability layers
        .layer(axum_middleware::from_fn(log_request))
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        // Concurrency cap - outermost, applies before any per-request work
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(state)
}

/// 访问日志。5xx 记 warn, 其余 info。
async fn log_request(req: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status();
    let latency = start.elapsed();
    if status.is_server_error() {
        warn!(
            target: "http_access",
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Request failed"
        );
    } else {
        info!(
            target: "http_access",
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
    }
    response
}
