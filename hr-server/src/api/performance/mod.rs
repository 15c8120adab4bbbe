//! Performance Review API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Performance review router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/performance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/reviews", post(handler::create_review))
        .route("/reviews/{id}/feedback", post(handler::submit_feedback))
        .route(
            "/reviews/manager/{id}",
            get(handler::list_manager_reviews),
        )
}
