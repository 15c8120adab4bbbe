//! Leave API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Leave router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leave", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/types", get(handler::list_types).post(handler::create_type))
        .route("/balances", put(handler::grant_balance))
        .route("/balances/{employee_id}", get(handler::get_balances))
        .route(
            "/requests",
            get(handler::list_my_requests).post(handler::create_request),
        )
        .route("/requests/team", get(handler::list_team_requests))
        .route("/requests/{id}/action", put(handler::action_request))
        .route("/requests/{id}/cancel", post(handler::cancel_request))
}
