//! Leave Request Model (请假申请)

use serde::{Deserialize, Serialize};

/// Leave request state machine
///
/// `PENDING -> APPROVED_BY_TEAM_LEAD -> APPROVED_BY_HR` (terminal) or
/// `PENDING | APPROVED_BY_TEAM_LEAD -> REJECTED` (terminal). Team-lead
/// approval is optional; HR can decide straight from `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    ApprovedByTeamLead,
    ApprovedByHr,
    Rejected,
}

impl LeaveStatus {
    /// Terminal states cannot be decided again
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::ApprovedByHr | LeaveStatus::Rejected)
    }
}

/// Leave request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveRequest {
    pub id: i64,
    /// Denormalized for tenant isolation on every query
    pub company_id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    /// Start date (YYYY-MM-DD), inclusive
    pub start_date: String,
    /// End date (YYYY-MM-DD), inclusive
    pub end_date: String,
    /// Working days covered by the request (mask-counted)
    pub total_days: i64,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    /// Routing copies taken from the employee at creation time
    pub team_lead_id: Option<i64>,
    pub hr_id: Option<i64>,
    /// Remarks recorded with the deciding action
    pub remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Submit leave request payload
///
/// `employee_id` is only honored for HR-tier callers submitting on behalf of
/// an employee; everyone else requests for themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestCreate {
    pub employee_id: Option<i64>,
    pub leave_type_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}

/// Approve / reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Decide leave request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDecision {
    pub decision: ApprovalDecision,
    pub remarks: Option<String>,
}
