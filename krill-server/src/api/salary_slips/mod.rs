//! Salary Slip API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_hr;
use crate::core::ServerState;

/// Salary slip router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/salary-slips", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：员工看自己的，HR 看全公司 (handler 内判定)
    let read_routes = Router::new()
        .route("/employee/{employee_id}", get(handler::list_for_employee))
        .route("/{id}", get(handler::get_by_id));

    // 生成路由：仅 HR 层
    let manage_routes = Router::new()
        .route("/", post(handler::generate))
        .layer(middleware::from_fn(require_hr));

    read_routes.merge(manage_routes)
}
