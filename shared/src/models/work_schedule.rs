//! Work Schedule Model (工作日配置)
//!
//! One row per company: a seven-day working mask plus hours per day.
//! `working_days_per_week` is derived from the mask and recomputed on every
//! update; it is never authoritative on its own.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Per-company weekly work configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct WorkSchedule {
    pub id: i64,
    pub company_id: i64,
    /// Working hours per working day
    pub working_hours_per_day: f64,
    pub monday_working: bool,
    pub tuesday_working: bool,
    pub wednesday_working: bool,
    pub thursday_working: bool,
    pub friday_working: bool,
    pub saturday_working: bool,
    pub sunday_working: bool,
    /// Count of true entries in the mask (derived)
    pub working_days_per_week: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl WorkSchedule {
    /// Whether the given weekday is marked working in the mask
    pub fn is_working(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday_working,
            Weekday::Tue => self.tuesday_working,
            Weekday::Wed => self.wednesday_working,
            Weekday::Thu => self.thursday_working,
            Weekday::Fri => self.friday_working,
            Weekday::Sat => self.saturday_working,
            Weekday::Sun => self.sunday_working,
        }
    }

    /// Recount working days per week from the mask
    pub fn count_working_days(&self) -> i64 {
        [
            self.monday_working,
            self.tuesday_working,
            self.wednesday_working,
            self.thursday_working,
            self.friday_working,
            self.saturday_working,
            self.sunday_working,
        ]
        .iter()
        .filter(|w| **w)
        .count() as i64
    }
}

/// Update work schedule payload (HR only). Omitted fields keep their value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkScheduleUpdate {
    pub working_hours_per_day: Option<f64>,
    pub monday_working: Option<bool>,
    pub tuesday_working: Option<bool>,
    pub wednesday_working: Option<bool>,
    pub thursday_working: Option<bool>,
    pub friday_working: Option<bool>,
    pub saturday_working: Option<bool>,
    pub sunday_working: Option<bool>,
}
