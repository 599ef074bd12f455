//! Leave Balance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Datelike;
use serde::Deserialize;

use shared::models::LeaveBalanceWithType;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{employee, leave_balance};
use crate::db::with_retry;
use crate::leave::ledger;
use crate::utils::{AppError, AppResult, time};

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub year: Option<i64>,
}

/// List an employee's balances for a year, materializing missing rows.
///
/// Employees can read their own; HR tier can read anyone in the company.
pub async fn list_for_employee(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<BalanceQuery>,
) -> AppResult<Json<Vec<LeaveBalanceWithType>>> {
    if employee_id != user.id && !user.is_hr_tier() {
        // Indistinguishable from a missing employee
        return Err(AppError::not_found(format!(
            "Employee {employee_id} not found"
        )));
    }

    let emp = employee::find_by_id(&state.pool, user.company_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

    let year = query.year.unwrap_or_else(|| time::today().year() as i64);

    // Read path that may write: missing rows are created with proration
    with_retry(|| ledger::get_or_create_balances(&state.pool, &emp, year)).await?;

    let balances = leave_balance::find_with_types(&state.pool, emp.id, year).await?;
    Ok(Json(balances))
}
