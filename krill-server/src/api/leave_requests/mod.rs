//! Leave Request API Module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Leave request router
///
/// 决策权限在 workflow 内按角色判定 (组长路径 / HR 路径)，这里不再加
/// 路由级守卫。
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leave-requests", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/decision", post(handler::decide))
}
