//! Work Schedule API Handlers

use axum::{Json, extract::State};

use shared::models::{WorkSchedule, WorkScheduleUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::work_schedule;
use crate::utils::{AppError, AppResult};
use crate::workdays;

/// Get the company's work schedule (materializes the default on first read)
pub async fn get(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<WorkSchedule>> {
    // Never fails: falls back to the in-memory default on store errors
    let schedule = workdays::get_config(&state.pool, user.company_id).await;
    Ok(Json(schedule))
}

/// Update the mask / hours; the weekly count is recomputed from the mask
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WorkScheduleUpdate>,
) -> AppResult<Json<WorkSchedule>> {
    if let Some(hours) = payload.working_hours_per_day
        && !(0.0..=24.0).contains(&hours)
    {
        return Err(AppError::validation(format!(
            "working_hours_per_day must be between 0 and 24, got {hours}"
        )));
    }

    let updated = work_schedule::update(&state.pool, user.company_id, payload).await?;
    Ok(Json(updated))
}
