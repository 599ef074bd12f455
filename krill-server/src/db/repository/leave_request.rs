//! Leave Request Repository
//!
//! Status transitions are enforced with conditional UPDATEs
//! (`WHERE status IN (...)`), the same single-statement pattern used for
//! shift closing: zero rows affected means the transition lost.

use super::{RepoError, RepoResult};
use shared::models::{LeaveRequest, LeaveStatus};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, employee_id, leave_type_id, start_date, end_date, total_days, reason, status, team_lead_id, hr_id, remarks, created_at, updated_at";

fn status_str(status: LeaveStatus) -> &'static str {
    match status {
        LeaveStatus::Pending => "PENDING",
        LeaveStatus::ApprovedByTeamLead => "APPROVED_BY_TEAM_LEAD",
        LeaveStatus::ApprovedByHr => "APPROVED_BY_HR",
        LeaveStatus::Rejected => "REJECTED",
    }
}

pub async fn find_by_id(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
) -> RepoResult<Option<LeaveRequest>> {
    let request = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE company_id = ? AND id = ?"
    ))
    .bind(company_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(request)
}

pub async fn find_all_for_company(
    pool: &SqlitePool,
    company_id: i64,
) -> RepoResult<Vec<LeaveRequest>> {
    let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE company_id = ? ORDER BY created_at DESC"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

pub async fn find_by_employee(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
) -> RepoResult<Vec<LeaveRequest>> {
    let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE company_id = ? AND employee_id = ? ORDER BY created_at DESC"
    ))
    .bind(company_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

/// Requests routed to a team lead that still await their decision
pub async fn find_pending_for_team_lead(
    pool: &SqlitePool,
    company_id: i64,
    team_lead_id: i64,
) -> RepoResult<Vec<LeaveRequest>> {
    let requests = sqlx::query_as::<_, LeaveRequest>(&format!(
        "SELECT {COLUMNS} FROM leave_request WHERE company_id = ? AND team_lead_id = ? AND status = 'PENDING' ORDER BY created_at"
    ))
    .bind(company_id)
    .bind(team_lead_id)
    .fetch_all(pool)
    .await?;
    Ok(requests)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    start_date: &str,
    end_date: &str,
    total_days: i64,
    reason: Option<&str>,
    team_lead_id: Option<i64>,
    hr_id: Option<i64>,
) -> RepoResult<LeaveRequest> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO leave_request (id, company_id, employee_id, leave_type_id, start_date, end_date, total_days, reason, status, team_lead_id, hr_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'PENDING', ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(company_id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(start_date)
    .bind(end_date)
    .bind(total_days)
    .bind(reason)
    .bind(team_lead_id)
    .bind(hr_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave request".into()))
}

/// Atomically transition a request that is still in one of `from`.
///
/// Returns `true` when the transition was applied; `false` means the request
/// either does not exist in this company or is no longer in an accepted
/// state — the caller distinguishes the two.
pub async fn transition_status(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
    from: &[LeaveStatus],
    to: LeaveStatus,
    remarks: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();

    // `from` is one or two states; build the IN list from fixed literals
    let placeholders = from
        .iter()
        .map(|s| format!("'{}'", status_str(*s)))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "UPDATE leave_request SET status = ?1, remarks = COALESCE(?2, remarks), updated_at = ?3 WHERE company_id = ?4 AND id = ?5 AND status IN ({placeholders})"
    );

    let rows = sqlx::query(&sql)
        .bind(status_str(to))
        .bind(remarks)
        .bind(now)
        .bind(company_id)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(rows.rows_affected() > 0)
}

/// Approved unpaid-type requests overlapping an inclusive date window.
///
/// Dates are ISO `YYYY-MM-DD` text, so lexicographic comparison is date
/// comparison.
pub async fn find_approved_unpaid_overlapping(
    pool: &SqlitePool,
    company_id: i64,
    employee_id: i64,
    window_start: &str,
    window_end: &str,
) -> RepoResult<Vec<LeaveRequest>> {
    let requests = sqlx::query_as::<_, LeaveRequest>(
        "SELECT lr.id, lr.company_id, lr.employee_id, lr.leave_type_id, lr.start_date, lr.end_date, lr.total_days, lr.reason, lr.status, lr.team_lead_id, lr.hr_id, lr.remarks, lr.created_at, lr.updated_at FROM leave_request lr JOIN leave_type lt ON lt.id = lr.leave_type_id WHERE lr.company_id = ?1 AND lr.employee_id = ?2 AND lr.status = 'APPROVED_BY_HR' AND lt.is_paid = 0 AND lr.start_date <= ?4 AND lr.end_date >= ?3 ORDER BY lr.start_date",
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(window_start)
    .bind(window_end)
    .fetch_all(pool)
    .await?;
    Ok(requests)
}
