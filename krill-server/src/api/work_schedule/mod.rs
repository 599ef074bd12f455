//! Work Schedule API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::put};

use crate::auth::require_hr;
use crate::core::ServerState;

/// Work schedule router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/work-schedule", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：所有角色都需要看日历口径
    let read_routes = Router::new().route("/", get(handler::get));

    // 管理路由：仅 HR 层可以改掩码
    let manage_routes = Router::new()
        .route("/", put(handler::update))
        .layer(middleware::from_fn(require_hr));

    read_routes.merge(manage_routes)
}
