//! Fixed Deduction API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{DeductionKind, FixedDeduction, FixedDeductionCreate, FixedDeductionUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{employee, fixed_deduction};
use crate::utils::validation::{MAX_NAME_LEN, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResult};

fn validate_value(kind: DeductionKind, value: f64) -> AppResult<()> {
    validate_amount(value, "value")?;
    if kind == DeductionKind::Percent && value > 100.0 {
        return Err(AppError::validation(format!(
            "Percent deduction cannot exceed 100, got {value}"
        )));
    }
    Ok(())
}

/// Create a fixed deduction for an employee
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<FixedDeductionCreate>,
) -> AppResult<Json<FixedDeduction>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_value(payload.kind, payload.value)?;

    // The employee must exist in this company
    employee::find_by_id(&state.pool, user.company_id, payload.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Employee {} not found", payload.employee_id))
        })?;

    let created = fixed_deduction::create(&state.pool, user.company_id, payload).await?;
    Ok(Json(created))
}

/// List an employee's fixed deductions (active and inactive)
pub async fn list_for_employee(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
) -> AppResult<Json<Vec<FixedDeduction>>> {
    let deductions =
        fixed_deduction::find_by_employee(&state.pool, user.company_id, employee_id).await?;
    Ok(Json(deductions))
}

/// Update a fixed deduction
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<FixedDeductionUpdate>,
) -> AppResult<Json<FixedDeduction>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(value) = payload.value {
        // Kind may change in the same request; validate against the target kind
        let kind = match payload.kind {
            Some(k) => k,
            None => {
                fixed_deduction::find_by_id(&state.pool, user.company_id, id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found(format!("Fixed deduction {id} not found"))
                    })?
                    .kind
            }
        };
        validate_value(kind, value)?;
    }

    let updated = fixed_deduction::update(&state.pool, user.company_id, id, payload).await?;
    Ok(Json(updated))
}

/// Delete a fixed deduction
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = fixed_deduction::delete(&state.pool, user.company_id, id).await?;
    Ok(Json(result))
}
