//! Reports API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Analytics report router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/headcount", get(handler::headcount))
        .route("/turnover", get(handler::turnover))
        .route("/leave-utilization", get(handler::leave_utilization))
        .route("/absenteeism", get(handler::absenteeism))
        .route("/export/{report_type}", get(handler::export))
}
