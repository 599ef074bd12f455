//! Salary Slip Model (工资单)
//!
//! One slip per (employee, month, year), immutable once created. Detail
//! rows carry every addition/deduction component, including fixed
//! deductions materialized at generation time.

use serde::{Deserialize, Serialize};

/// Addition or deduction component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    Addition,
    Deduction,
}

/// Salary slip header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalarySlip {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    /// 1–12
    pub month: i64,
    pub year: i64,
    /// Monthly basic salary (annual / 12)
    pub basic_salary: f64,
    /// Working days in the month per the company mask
    pub total_working_days: i64,
    /// total_working_days - unpaid_leaves
    pub actual_working_days: i64,
    /// Approved unpaid-type leave days inside the month
    pub unpaid_leaves: i64,
    pub gross_salary: f64,
    pub total_additions: f64,
    pub total_deductions: f64,
    pub net_salary: f64,
    /// Set when unpaid leave is approved after the slip was generated;
    /// advisory for operators — slips are never regenerated in place
    pub needs_recalculation: bool,
    pub generated_by: Option<i64>,
    pub created_at: i64,
}

/// Salary slip component row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SalarySlipDetail {
    pub id: i64,
    pub slip_id: i64,
    pub name: String,
    pub kind: AdjustmentKind,
    pub amount: f64,
}

/// Caller-supplied ad hoc adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentInput {
    pub name: String,
    pub amount: f64,
    pub kind: AdjustmentKind,
}

/// Generate slip payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalarySlipGenerate {
    pub employee_id: i64,
    pub month: i64,
    pub year: i64,
    #[serde(default)]
    pub adjustments: Vec<AdjustmentInput>,
}

/// Slip plus its component rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalarySlipWithDetails {
    #[serde(flatten)]
    pub slip: SalarySlip,
    pub details: Vec<SalarySlipDetail>,
}
