//! Leave Type Repository
//!
//! Read-only catalog seeded by migration.

use super::RepoResult;
use shared::models::LeaveType;
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<LeaveType>> {
    let types = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, is_paid, description FROM leave_type ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(types)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LeaveType>> {
    let leave_type = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, is_paid, description FROM leave_type WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(leave_type)
}
