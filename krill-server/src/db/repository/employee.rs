//! Employee Repository
//!
//! Every query is company-scoped; a row from another company is
//! indistinguishable from a missing one.

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, account_id, full_name, email, joining_date, salary, leave_entitlement, team_lead_id, created_by, is_active, created_at, updated_at";

/// Find all active employees of a company
pub async fn find_all(pool: &SqlitePool, company_id: i64) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE company_id = ? AND is_active = 1 ORDER BY full_name"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find all employees including inactive
pub async fn find_all_with_inactive(
    pool: &SqlitePool,
    company_id: i64,
) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE company_id = ? ORDER BY full_name"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find active employees onboarded by a specific HR user (HR-scoped visibility)
pub async fn find_created_by(
    pool: &SqlitePool,
    company_id: i64,
    hr_id: i64,
) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE company_id = ? AND created_by = ? AND is_active = 1 ORDER BY full_name"
    ))
    .bind(company_id)
    .bind(hr_id)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Find employee by id within a company
pub async fn find_by_id(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE company_id = ? AND id = ?"
    ))
    .bind(company_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

/// Create a new employee
pub async fn create(
    pool: &SqlitePool,
    company_id: i64,
    created_by: Option<i64>,
    data: EmployeeCreate,
) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO employee (id, company_id, account_id, full_name, email, joining_date, salary, leave_entitlement, team_lead_id, created_by, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?11)",
    )
    .bind(id)
    .bind(company_id)
    .bind(&data.account_id)
    .bind(&data.full_name)
    .bind(&data.email)
    .bind(&data.joining_date)
    .bind(data.salary)
    .bind(data.leave_entitlement)
    .bind(data.team_lead_id)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Update an employee
pub async fn update(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
    data: EmployeeUpdate,
) -> RepoResult<Employee> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE employee SET full_name = COALESCE(?1, full_name), email = COALESCE(?2, email), salary = COALESCE(?3, salary), leave_entitlement = COALESCE(?4, leave_entitlement), team_lead_id = COALESCE(?5, team_lead_id), is_active = COALESCE(?6, is_active), updated_at = ?7 WHERE company_id = ?8 AND id = ?9",
    )
    .bind(&data.full_name)
    .bind(&data.email)
    .bind(data.salary)
    .bind(data.leave_entitlement)
    .bind(data.team_lead_id)
    .bind(data.is_active)
    .bind(now)
    .bind(company_id)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Soft-delete an employee (auth-account removal path)
pub async fn deactivate(pool: &SqlitePool, company_id: i64, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET is_active = 0, account_id = NULL, updated_at = ?1 WHERE company_id = ?2 AND id = ?3 AND is_active = 1",
    )
    .bind(now)
    .bind(company_id)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(true)
}
