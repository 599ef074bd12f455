//! Calendar Event API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};

use crate::auth::require_hr;
use crate::core::ServerState;

/// Calendar event router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/calendar-events", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：全员可见公司日历
    let read_routes = Router::new().route("/", get(handler::list));

    // 管理路由：仅 HR 层维护日历
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_hr));

    read_routes.merge(manage_routes)
}
