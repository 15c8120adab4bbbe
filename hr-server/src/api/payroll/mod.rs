//! Payroll API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Payroll router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payroll", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/runs", get(handler::list_runs).post(handler::create_run))
        .route("/runs/{id}", get(handler::get_run))
        .route("/payslips/{employee_id}", get(handler::list_payslips))
        .route(
            "/payslips/{employee_id}/{payslip_id}",
            get(handler::download_payslip),
        )
        .route(
            "/compensation/{employee_id}",
            put(handler::update_compensation),
        )
        .route(
            "/compensation/history/{employee_id}",
            get(handler::compensation_history),
        )
}
