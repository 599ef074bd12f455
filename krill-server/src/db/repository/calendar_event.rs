//! Calendar Event Repository

use super::{RepoError, RepoResult};
use shared::models::{CalendarEvent, CalendarEventCreate, CalendarEventUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, company_id, title, description, event_date, created_by, created_at, updated_at";

pub async fn find_by_id(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
) -> RepoResult<Option<CalendarEvent>> {
    let event = sqlx::query_as::<_, CalendarEvent>(&format!(
        "SELECT {COLUMNS} FROM calendar_event WHERE company_id = ? AND id = ?"
    ))
    .bind(company_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(event)
}

/// Events within an inclusive date window (ISO text comparison)
pub async fn find_in_range(
    pool: &SqlitePool,
    company_id: i64,
    from: &str,
    to: &str,
) -> RepoResult<Vec<CalendarEvent>> {
    let events = sqlx::query_as::<_, CalendarEvent>(&format!(
        "SELECT {COLUMNS} FROM calendar_event WHERE company_id = ? AND event_date >= ? AND event_date <= ? ORDER BY event_date"
    ))
    .bind(company_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn create(
    pool: &SqlitePool,
    company_id: i64,
    created_by: Option<i64>,
    data: CalendarEventCreate,
) -> RepoResult<CalendarEvent> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO calendar_event (id, company_id, title, description, event_date, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(company_id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.event_date)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create calendar event".into()))
}

pub async fn update(
    pool: &SqlitePool,
    company_id: i64,
    id: i64,
    data: CalendarEventUpdate,
) -> RepoResult<CalendarEvent> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE calendar_event SET title = COALESCE(?1, title), description = COALESCE(?2, description), event_date = COALESCE(?3, event_date), updated_at = ?4 WHERE company_id = ?5 AND id = ?6",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.event_date)
    .bind(now)
    .bind(company_id)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Calendar event {id} not found")));
    }
    find_by_id(pool, company_id, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Calendar event {id} not found")))
}

pub async fn delete(pool: &SqlitePool, company_id: i64, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM calendar_event WHERE company_id = ? AND id = ?")
        .bind(company_id)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Calendar event {id} not found")));
    }
    Ok(true)
}
