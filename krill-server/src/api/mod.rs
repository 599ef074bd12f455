//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`companies`] - 公司 (租户) 接口
//! - [`employees`] - 员工管理接口
//! - [`work_schedule`] - 工作日配置接口
//! - [`leave_types`] - 假型目录接口
//! - [`leave_balances`] - 请假余额接口
//! - [`leave_requests`] - 请假申请 / 审批接口
//! - [`salary_slips`] - 工资单接口
//! - [`fixed_deductions`] - 固定扣款接口
//! - [`calendar_events`] - 公司日历接口
//! - [`maintenance`] - 维护操作接口

pub mod health;

pub mod companies;
pub mod employees;
pub mod work_schedule;

pub mod leave_types;
pub mod leave_balances;
pub mod leave_requests;

pub mod salary_slips;
pub mod fixed_deductions;

pub mod calendar_events;
pub mod maintenance;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// 组装全部 API 路由
///
/// 认证中间件包住所有 `/api/` 路由 (`/api/health` 除外)。
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(companies::router())
        .merge(employees::router())
        .merge(work_schedule::router())
        .merge(leave_types::router())
        .merge(leave_balances::router())
        .merge(leave_requests::router())
        .merge(salary_slips::router())
        .merge(fixed_deductions::router())
        .merge(calendar_events::router())
        .merge(maintenance::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
