//! Leave Type API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Leave type router (read-only catalog)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/leave-types", get(handler::list))
}
