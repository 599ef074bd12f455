//! Salary Slip API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{SalarySlip, SalarySlipGenerate, SalarySlipWithDetails};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::salary_slip;
use crate::payroll;
use crate::utils::{AppError, AppResult};

/// Generate a slip for (employee, month, year); 409 when one exists
pub async fn generate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SalarySlipGenerate>,
) -> AppResult<Json<SalarySlipWithDetails>> {
    let slip = payroll::generate_slip(&state.pool, &state.notifier, &user, payload).await?;
    Ok(Json(slip))
}

/// List an employee's slips (self, or HR tier)
pub async fn list_for_employee(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
) -> AppResult<Json<Vec<SalarySlip>>> {
    if employee_id != user.id && !user.is_hr_tier() {
        return Err(AppError::not_found(format!(
            "Employee {employee_id} not found"
        )));
    }

    let slips = salary_slip::find_all_for_employee(&state.pool, user.company_id, employee_id).await?;
    Ok(Json(slips))
}

/// Get a slip with its component rows (owner or HR tier)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<SalarySlipWithDetails>> {
    let slip = salary_slip::find_by_id(&state.pool, user.company_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Salary slip {id} not found")))?;

    if slip.employee_id != user.id && !user.is_hr_tier() {
        return Err(AppError::not_found(format!("Salary slip {id} not found")));
    }

    let details = salary_slip::find_details(&state.pool, slip.id).await?;
    Ok(Json(SalarySlipWithDetails { slip, details }))
}
