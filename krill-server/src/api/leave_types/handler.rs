//! Leave Type API Handlers

use axum::{Json, extract::State};

use shared::models::LeaveType;

use crate::core::ServerState;
use crate::db::repository::leave_type;
use crate::utils::AppResult;

/// List the leave type catalog
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<LeaveType>>> {
    let types = leave_type::find_all(&state.pool).await?;
    Ok(Json(types))
}
