//! Fixed Deduction API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_hr;
use crate::core::ServerState;

/// Fixed deduction router (HR tier only)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/fixed-deductions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/employee/{employee_id}", get(handler::list_for_employee))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_hr))
}
