//! Company API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Company router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/companies", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：任何已认证用户可以查看自己的公司
    let read_routes = Router::new().route("/current", get(handler::get_current));

    // 管理路由：仅平台管理员可以开租户
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
