//! Leave Balance Repository
//!
//! Persistence for the ledger. The schema carries
//! `UNIQUE (employee_id, leave_type_id, year)`, so `insert_if_absent` is
//! race-safe; the Rust-side dedup in `leave::ledger` only repairs rows that
//! predate the constraint.

use super::{RepoError, RepoResult};
use shared::models::{LeaveBalance, LeaveBalanceWithType};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, employee_id, leave_type_id, year, total_days, used_days, remaining_days, created_at, updated_at";

pub async fn find_one(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type_id: i64,
    year: i64,
) -> RepoResult<Option<LeaveBalance>> {
    let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
        "SELECT {COLUMNS} FROM leave_balance WHERE employee_id = ? AND leave_type_id = ? AND year = ? ORDER BY created_at, id LIMIT 1"
    ))
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .fetch_optional(pool)
    .await?;
    Ok(balance)
}

pub async fn find_by_employee_year(
    pool: &SqlitePool,
    employee_id: i64,
    year: i64,
) -> RepoResult<Vec<LeaveBalance>> {
    let balances = sqlx::query_as::<_, LeaveBalance>(&format!(
        "SELECT {COLUMNS} FROM leave_balance WHERE employee_id = ? AND year = ? ORDER BY leave_type_id, created_at, id"
    ))
    .bind(employee_id)
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(balances)
}

/// Balances joined with their leave type, for list views
pub async fn find_with_types(
    pool: &SqlitePool,
    employee_id: i64,
    year: i64,
) -> RepoResult<Vec<LeaveBalanceWithType>> {
    let balances = sqlx::query_as::<_, LeaveBalanceWithType>(
        "SELECT lb.id, lb.employee_id, lb.leave_type_id, lt.name AS leave_type_name, lt.is_paid, lb.year, lb.total_days, lb.used_days, lb.remaining_days FROM leave_balance lb JOIN leave_type lt ON lt.id = lb.leave_type_id WHERE lb.employee_id = ? AND lb.year = ? ORDER BY lb.leave_type_id",
    )
    .bind(employee_id)
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(balances)
}

/// Insert a balance row unless one already exists for the key.
///
/// `INSERT OR IGNORE`: only inserts when (employee_id, leave_type_id, year)
/// is absent, so concurrent first accesses cannot create duplicates.
pub async fn insert_if_absent(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    year: i64,
    total_days: i64,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT OR IGNORE INTO leave_balance (id, company_id, employee_id, leave_type_id, year, total_days, used_days, remaining_days, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(company_id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .bind(total_days)
    .bind(now)
    .execute(pool)
    .await?;

    find_one(pool, employee_id, leave_type_id, year)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to materialize leave balance".into()))
}

/// Apply usage in one statement, restoring the ledger invariant
/// `remaining = max(0, total - used)` as part of the same write.
pub async fn apply_usage(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type_id: i64,
    year: i64,
    days: i64,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE leave_balance SET used_days = used_days + ?1, remaining_days = MAX(0, total_days - (used_days + ?1)), updated_at = ?2 WHERE employee_id = ?3 AND leave_type_id = ?4 AND year = ?5",
    )
    .bind(days)
    .bind(now)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Leave balance for employee {employee_id} type {leave_type_id} year {year} not found"
        )));
    }
    find_one(pool, employee_id, leave_type_id, year)
        .await?
        .ok_or_else(|| RepoError::NotFound("Leave balance disappeared after update".into()))
}

/// Delete a single balance row by id (dedup repair path)
pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM leave_balance WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Every balance row in creation order, for the global cleanup sweep
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<LeaveBalance>> {
    let balances = sqlx::query_as::<_, LeaveBalance>(&format!(
        "SELECT {COLUMNS} FROM leave_balance ORDER BY employee_id, leave_type_id, year, created_at, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(balances)
}
