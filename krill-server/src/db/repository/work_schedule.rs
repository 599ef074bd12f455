//! Work Schedule Repository
//!
//! Lazy-created per-company config. `get_or_create` documents that a write
//! may occur inside what looks like a read path.

use super::{RepoError, RepoResult};
use shared::models::{WorkSchedule, WorkScheduleUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, working_hours_per_day, monday_working, tuesday_working, wednesday_working, thursday_working, friday_working, saturday_working, sunday_working, working_days_per_week, created_at, updated_at";

pub async fn find_by_company(
    pool: &SqlitePool,
    company_id: i64,
) -> RepoResult<Option<WorkSchedule>> {
    let schedule = sqlx::query_as::<_, WorkSchedule>(&format!(
        "SELECT {COLUMNS} FROM work_schedule WHERE company_id = ?"
    ))
    .bind(company_id)
    .fetch_optional(pool)
    .await?;
    Ok(schedule)
}

/// Find the company's schedule, materializing the Mon-Fri / 8h default on
/// first access. `INSERT OR IGNORE` against the unique company_id keeps
/// concurrent first reads race-safe.
pub async fn get_or_create(pool: &SqlitePool, company_id: i64) -> RepoResult<WorkSchedule> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT OR IGNORE INTO work_schedule (id, company_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
    )
    .bind(id)
    .bind(company_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_company(pool, company_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to materialize work schedule".into()))
}

/// Apply a partial update and recompute the derived weekly count from the
/// final mask. HR-tier only (enforced at the route).
pub async fn update(
    pool: &SqlitePool,
    company_id: i64,
    data: WorkScheduleUpdate,
) -> RepoResult<WorkSchedule> {
    let mut schedule = get_or_create(pool, company_id).await?;

    if let Some(h) = data.working_hours_per_day {
        schedule.working_hours_per_day = h;
    }
    if let Some(v) = data.monday_working {
        schedule.monday_working = v;
    }
    if let Some(v) = data.tuesday_working {
        schedule.tuesday_working = v;
    }
    if let Some(v) = data.wednesday_working {
        schedule.wednesday_working = v;
    }
    if let Some(v) = data.thursday_working {
        schedule.thursday_working = v;
    }
    if let Some(v) = data.friday_working {
        schedule.friday_working = v;
    }
    if let Some(v) = data.saturday_working {
        schedule.saturday_working = v;
    }
    if let Some(v) = data.sunday_working {
        schedule.sunday_working = v;
    }

    // Derived, never authoritative on its own
    schedule.working_days_per_week = schedule.count_working_days();
    let now = shared::util::now_millis();

    sqlx::query(
        "UPDATE work_schedule SET working_hours_per_day = ?1, monday_working = ?2, tuesday_working = ?3, wednesday_working = ?4, thursday_working = ?5, friday_working = ?6, saturday_working = ?7, sunday_working = ?8, working_days_per_week = ?9, updated_at = ?10 WHERE company_id = ?11",
    )
    .bind(schedule.working_hours_per_day)
    .bind(schedule.monday_working)
    .bind(schedule.tuesday_working)
    .bind(schedule.wednesday_working)
    .bind(schedule.thursday_working)
    .bind(schedule.friday_working)
    .bind(schedule.saturday_working)
    .bind(schedule.sunday_working)
    .bind(schedule.working_days_per_week)
    .bind(now)
    .bind(company_id)
    .execute(pool)
    .await?;

    find_by_company(pool, company_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Work schedule for company {company_id} not found")))
}
