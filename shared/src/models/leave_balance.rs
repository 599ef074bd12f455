//! Leave Balance Model
//!
//! The ledger's core row: exactly one per (employee, leave_type, year).
//! After every mutation `remaining_days == max(0, total_days - used_days)`.

use serde::{Deserialize, Serialize};

/// Per-employee, per-type, per-year leave balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveBalance {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub year: i64,
    pub total_days: i64,
    pub used_days: i64,
    pub remaining_days: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Balance joined with its leave type (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveBalanceWithType {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub leave_type_name: String,
    pub is_paid: bool,
    pub year: i64,
    pub total_days: i64,
    pub used_days: i64,
    pub remaining_days: i64,
}
