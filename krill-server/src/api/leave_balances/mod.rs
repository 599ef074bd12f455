//! Leave Balance API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Leave balance router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/leave-balances/{employee_id}",
        get(handler::list_for_employee),
    )
}
