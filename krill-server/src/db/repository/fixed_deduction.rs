//! Fixed Deduction Repository

use super::{RepoError, RepoResult};
use shared::models::{FixedDeduction, FixedDeductionCreate, FixedDeductionUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, employee_id, name, kind, value, is_active, created_at, updated_at";

pub async fn find_by_id(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
) -> RepoResult<Option<FixedDeduction>> {
    let deduction = sqlx::query_as::<_, FixedDeduction>(&format!(
        "SELECT {COLUMNS} FROM fixed_deduction WHERE company_id = ? AND id = ?"
    ))
    .bind(company_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(deduction)
}

pub async fn find_by_employee(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
) -> RepoResult<Vec<FixedDeduction>> {
    let deductions = sqlx::query_as::<_, FixedDeduction>(&format!(
        "SELECT {COLUMNS} FROM fixed_deduction WHERE company_id = ? AND employee_id = ? ORDER BY created_at"
    ))
    .bind(company_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(deductions)
}

/// Active deductions only — the set payroll materializes into a slip
pub async fn find_active_for_employee(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
) -> RepoResult<Vec<FixedDeduction>> {
    let deductions = sqlx::query_as::<_, FixedDeduction>(&format!(
        "SELECT {COLUMNS} FROM fixed_deduction WHERE company_id = ? AND employee_id = ? AND is_active = 1 ORDER BY created_at"
    ))
    .bind(company_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(deductions)
}

pub async fn create(
    pool: &SqlitePool,
    company_id: i64,
    data: FixedDeductionCreate,
) -> RepoResult<FixedDeduction> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let kind_str = match data.kind {
        shared::models::DeductionKind::Flat => "FLAT",
        shared::models::DeductionKind::Percent => "PERCENT",
    };

    sqlx::query(
        "INSERT INTO fixed_deduction (id, company_id, employee_id, name, kind, value, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(company_id)
    .bind(data.employee_id)
    .bind(&data.name)
    .bind(kind_str)
    .bind(data.value)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create fixed deduction".into()))
}

pub async fn update(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
    data: FixedDeductionUpdate,
) -> RepoResult<FixedDeduction> {
    let now = shared::util::now_millis();
    let kind_str = data.kind.map(|k| match k {
        shared::models::DeductionKind::Flat => "FLAT",
        shared::models::DeductionKind::Percent => "PERCENT",
    });

    let rows = sqlx::query(
        "UPDATE fixed_deduction SET name = COALESCE(?1, name), kind = COALESCE(?2, kind), value = COALESCE(?3, value), is_active = COALESCE(?4, is_active), updated_at = ?5 WHERE company_id = ?6 AND id = ?7",
    )
    .bind(&data.name)
    .bind(kind_str)
    .bind(data.value)
    .bind(data.is_active)
    .bind(now)
    .bind(company_id)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Fixed deduction {id} not found")));
    }
    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Fixed deduction {id} not found")))
}

pub async fn delete(pool: &SqlitePool, company_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM fixed_deduction WHERE company_id = ? AND id = ?")
        .bind(company_id)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Fixed deduction {id} not found")));
    }
    Ok(true)
}
