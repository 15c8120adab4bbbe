//! Attendance API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Attendance router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    // "/records/review" is static and wins over the "/records/{id}" capture.
    Router::new()
        .route("/shifts", get(handler::list_shifts))
        .route("/clock-in", post(handler::clock_in))
        .route("/clock-out", post(handler::clock_out))
        .route("/records/review", get(handler::list_review_queue))
        .route("/records/{id}", get(handler::list_records))
        .route("/records/{id}/adjustment", post(handler::request_adjustment))
        .route("/records/{id}/review", put(handler::review_record))
}
