//! Maintenance API Module

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Maintenance router (admin only)
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/maintenance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/cleanup", post(handler::cleanup))
        .layer(middleware::from_fn(require_admin))
}
