//! Position API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Position router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/positions", get(handler::list).post(handler::create))
}
