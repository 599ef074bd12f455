//! Fixed Deduction Model
//!
//! Recurring per-employee deductions applied to every generated slip while
//! active. Flat amounts are taken as-is; percent values apply to the
//! monthly salary.

use serde::{Deserialize, Serialize};

/// Flat amount or percent of monthly salary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeductionKind {
    Flat,
    Percent,
}

/// Fixed deduction entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FixedDeduction {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub name: String,
    pub kind: DeductionKind,
    /// Amount (FLAT) or percentage 0–100 (PERCENT)
    pub value: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create fixed deduction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDeductionCreate {
    pub employee_id: i64,
    pub name: String,
    pub kind: DeductionKind,
    pub value: f64,
}

/// Update fixed deduction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDeductionUpdate {
    pub name: Option<String>,
    pub kind: Option<DeductionKind>,
    pub value: Option<f64>,
    pub is_active: Option<bool>,
}
