//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};

use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, validate_amount, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

/// List active employees.
///
/// Plain `hr` users see only the employees they onboarded; managers and
/// admins see the whole company.
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    let employees = match user.role {
        Role::Hr => employee::find_created_by(&state.pool, user.company_id, user.id).await?,
        _ => employee::find_all(&state.pool, user.company_id).await?,
    };
    Ok(Json(employees))
}

/// List all employees including deactivated ones
pub async fn list_with_inactive(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    let employees = employee::find_all_with_inactive(&state.pool, user.company_id).await?;
    Ok(Json(employees))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    let found = employee::find_by_id(&state.pool, user.company_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))?;
    Ok(Json(found))
}

/// Onboard a new employee
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_amount(payload.salary, "salary")?;
    if payload.leave_entitlement < 0 {
        return Err(AppError::validation("leave_entitlement cannot be negative"));
    }
    // joining_date anchors the first leave year; must be a real date
    time::parse_date(&payload.joining_date)?;

    let created = employee::create(&state.pool, user.company_id, Some(user.id), payload).await?;
    Ok(Json(created))
}

/// Update an employee
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    if let Some(ref name) = payload.full_name {
        validate_required_text(name, "full_name", MAX_NAME_LEN)?;
    }
    if let Some(ref email) = payload.email {
        validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    }
    if let Some(salary) = payload.salary {
        validate_amount(salary, "salary")?;
    }
    if let Some(entitlement) = payload.leave_entitlement
        && entitlement < 0
    {
        return Err(AppError::validation("leave_entitlement cannot be negative"));
    }

    let updated = employee::update(&state.pool, user.company_id, id, payload).await?;
    Ok(Json(updated))
}

/// Soft-delete an employee (mirrors auth-account removal)
pub async fn deactivate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = employee::deactivate(&state.pool, user.company_id, id).await?;
    Ok(Json(result))
}
