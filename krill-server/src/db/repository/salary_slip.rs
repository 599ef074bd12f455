//! Salary Slip Repository
//!
//! One slip per (employee, month, year): the pre-insert existence check
//! produces the client-facing conflict, and the unique index backs it
//! against races.

use super::RepoResult;
use shared::models::{AdjustmentKind, SalarySlip, SalarySlipDetail};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, employee_id, month, year, basic_salary, total_working_days, actual_working_days, unpaid_leaves, gross_salary, total_additions, total_deductions, net_salary, needs_recalculation, generated_by, created_at";

pub async fn find_by_id(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
) -> RepoResult<Option<SalarySlip>> {
    let slip = sqlx::query_as::<_, SalarySlip>(&format!(
        "SELECT {COLUMNS} FROM salary_slip WHERE company_id = ? AND id = ?"
    ))
    .bind(company_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(slip)
}

pub async fn find_by_employee_month(
    pool: &SqlitePool,
    employee_id: i64,
    month: i64,
    year: i64,
) -> RepoResult<Option<SalarySlip>> {
    let slip = sqlx::query_as::<_, SalarySlip>(&format!(
        "SELECT {COLUMNS} FROM salary_slip WHERE employee_id = ? AND month = ? AND year = ?"
    ))
    .bind(employee_id)
    .bind(month)
    .bind(year)
    .fetch_optional(pool)
    .await?;
    Ok(slip)
}

pub async fn find_all_for_employee(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
) -> RepoResult<Vec<SalarySlip>> {
    let slips = sqlx::query_as::<_, SalarySlip>(&format!(
        "SELECT {COLUMNS} FROM salary_slip WHERE company_id = ? AND employee_id = ? ORDER BY year DESC, month DESC"
    ))
    .bind(company_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(slips)
}

pub async fn find_details(pool: &SqlitePool, slip_id: i64) -> RepoResult<Vec<SalarySlipDetail>> {
    let details = sqlx::query_as::<_, SalarySlipDetail>(
        "SELECT id, slip_id, name, kind, amount FROM salary_slip_detail WHERE slip_id = ? ORDER BY id",
    )
    .bind(slip_id)
    .fetch_all(pool)
    .await?;
    Ok(details)
}

/// Insert the slip header. A unique-index violation from a concurrent
/// generation surfaces as `RepoError::Duplicate`.
pub async fn insert_header(
    pool: &SqlitePool,
    slip: &SalarySlip,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO salary_slip (id, company_id, employee_id, month, year, basic_salary, total_working_days, actual_working_days, unpaid_leaves, gross_salary, total_additions, total_deductions, net_salary, needs_recalculation, generated_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
    )
    .bind(slip.id)
    .bind(slip.company_id)
    .bind(slip.employee_id)
    .bind(slip.month)
    .bind(slip.year)
    .bind(slip.basic_salary)
    .bind(slip.total_working_days)
    .bind(slip.actual_working_days)
    .bind(slip.unpaid_leaves)
    .bind(slip.gross_salary)
    .bind(slip.total_additions)
    .bind(slip.total_deductions)
    .bind(slip.net_salary)
    .bind(slip.needs_recalculation)
    .bind(slip.generated_by)
    .bind(slip.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_detail(
    pool: &SqlitePool,
    slip_id: i64,
    name: &str,
    kind: AdjustmentKind,
    amount: f64,
) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    let kind_str = match kind {
        AdjustmentKind::Addition => "ADDITION",
        AdjustmentKind::Deduction => "DEDUCTION",
    };

    sqlx::query(
        "INSERT INTO salary_slip_detail (id, slip_id, name, kind, amount) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(slip_id)
    .bind(name)
    .bind(kind_str)
    .bind(amount)
    .execute(pool)
    .await?;
    Ok(())
}

/// Mark an existing slip as needing recalculation (unpaid leave approved
/// after generation). Missing slip is not an error — there is simply
/// nothing to flag yet.
pub async fn flag_needs_recalculation(
    pool: &SqlitePool,
    employee_id: i64,
    month: i64,
    year: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE salary_slip SET needs_recalculation = 1 WHERE employee_id = ? AND month = ? AND year = ?",
    )
    .bind(employee_id)
    .bind(month)
    .bind(year)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
