//! Training API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Training course and enrollment router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/training", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/courses",
            get(handler::list_courses).post(handler::create_course),
        )
        .route("/enrollments", post(handler::enroll))
        .route("/enrollments/{employee_id}", get(handler::list_enrollments))
}
