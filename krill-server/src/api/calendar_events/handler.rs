//! Calendar Event API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Datelike;
use serde::Deserialize;

use shared::models::{CalendarEvent, CalendarEventCreate, CalendarEventUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::calendar_event;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppResult, time};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// List events in a date window; defaults to the current month
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<CalendarEvent>>> {
    let today = time::today();
    let (month_start, month_end) = time::month_bounds(today.month(), today.year())?;

    let from = match query.from {
        Some(ref s) => time::parse_date(s)?,
        None => month_start,
    };
    let to = match query.to {
        Some(ref s) => time::parse_date(s)?,
        None => month_end,
    };

    let events = calendar_event::find_in_range(
        &state.pool,
        user.company_id,
        &time::format_date(from),
        &time::format_date(to),
    )
    .await?;
    Ok(Json(events))
}

/// Create a calendar event
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CalendarEventCreate>,
) -> AppResult<Json<CalendarEvent>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    time::parse_date(&payload.event_date)?;

    let created =
        calendar_event::create(&state.pool, user.company_id, Some(user.id), payload).await?;
    Ok(Json(created))
}

/// Update a calendar event
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CalendarEventUpdate>,
) -> AppResult<Json<CalendarEvent>> {
    if let Some(ref title) = payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(ref date) = payload.event_date {
        time::parse_date(date)?;
    }

    let updated = calendar_event::update(&state.pool, user.company_id, id, payload).await?;
    Ok(Json(updated))
}

/// Delete a calendar event
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = calendar_event::delete(&state.pool, user.company_id, id).await?;
    Ok(Json(result))
}
