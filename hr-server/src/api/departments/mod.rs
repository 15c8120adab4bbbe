//! Department API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Department router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/departments",
        get(handler::list).post(handler::create),
    )
}
