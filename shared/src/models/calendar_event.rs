//! Calendar Event Model

use serde::{Deserialize, Serialize};

/// Company calendar event (holidays, all-hands, deadlines)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CalendarEvent {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Event date (YYYY-MM-DD)
    pub event_date: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create calendar event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventCreate {
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
}

/// Update calendar event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
}
