//! Employee Model

use serde::{Deserialize, Serialize};

/// Employee entity (员工)
///
/// The auth account itself lives in the external identity service;
/// `account_id` is the weak link to it. Removing the account soft-deletes
/// the employee (`is_active = false`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub company_id: i64,
    /// External auth account reference
    pub account_id: Option<String>,
    pub full_name: String,
    pub email: String,
    /// Joining date (YYYY-MM-DD); anchors the first leave year
    pub joining_date: String,
    /// Annual salary
    pub salary: f64,
    /// Annual paid-leave entitlement (days), basis for proration
    pub leave_entitlement: i64,
    pub team_lead_id: Option<i64>,
    /// HR user who onboarded this employee (HR-scoped visibility)
    pub created_by: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub full_name: String,
    pub email: String,
    pub joining_date: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub leave_entitlement: i64,
    pub team_lead_id: Option<i64>,
    pub account_id: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub salary: Option<f64>,
    pub leave_entitlement: Option<i64>,
    pub team_lead_id: Option<i64>,
    pub is_active: Option<bool>,
}
