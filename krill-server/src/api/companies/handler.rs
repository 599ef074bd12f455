//! Company API Handlers

use axum::{Json, extract::State};

use shared::models::{Company, CompanyCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{company, work_schedule};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Create a new company (tenant) and seed its default work schedule
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CompanyCreate>,
) -> AppResult<Json<Company>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let created = company::create(&state.pool, payload).await?;
    work_schedule::get_or_create(&state.pool, created.id).await?;

    Ok(Json(created))
}

/// Get the acting user's company
pub async fn get_current(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Company>> {
    let found = company::find_by_id(&state.pool, user.company_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Company {} not found", user.company_id)))?;
    Ok(Json(found))
}
