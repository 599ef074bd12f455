//! Leave Request API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{LeaveDecision, LeaveRequest, LeaveRequestCreate};

use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::db::repository::leave_request;
use crate::leave::workflow;
use crate::utils::{AppError, AppResult};

/// Submit a leave request (employees for themselves, HR on behalf of anyone)
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveRequestCreate>,
) -> AppResult<Json<LeaveRequest>> {
    let request = workflow::submit(&state.pool, &state.notifier, &user, payload).await?;
    Ok(Json(request))
}

/// List requests visible to the caller.
///
/// HR tier sees the whole company; team leads see their own requests plus
/// the ones routed to them; employees see their own.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let requests = match user.role {
        role if role.is_hr_tier() => {
            leave_request::find_all_for_company(&state.pool, user.company_id).await?
        }
        Role::TeamLead => {
            let mut own =
                leave_request::find_by_employee(&state.pool, user.company_id, user.id).await?;
            let routed =
                leave_request::find_pending_for_team_lead(&state.pool, user.company_id, user.id)
                    .await?;
            own.extend(routed);
            own
        }
        _ => leave_request::find_by_employee(&state.pool, user.company_id, user.id).await?,
    };
    Ok(Json(requests))
}

/// Get a single request (owner, routed team lead, or HR tier)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<LeaveRequest>> {
    let request = leave_request::find_by_id(&state.pool, user.company_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave request {id} not found")))?;

    let visible = user.is_hr_tier()
        || request.employee_id == user.id
        || request.team_lead_id == Some(user.id);
    if !visible {
        // Same shape as a true miss
        return Err(AppError::not_found(format!("Leave request {id} not found")));
    }

    Ok(Json(request))
}

/// Decide a request (team-lead or HR path, enforced by the workflow)
pub async fn decide(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<LeaveDecision>,
) -> AppResult<Json<LeaveRequest>> {
    let request = workflow::decide(&state.pool, &state.notifier, &user, id, payload).await?;
    Ok(Json(request))
}
