//! Leave Type Model
//!
//! Company-agnostic catalog seeded by migration. Effectively immutable
//! reference data; unpaid detection always goes through `is_paid`, never a
//! specific id.

use serde::{Deserialize, Serialize};

/// Leave type catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveType {
    pub id: i64,
    pub name: String,
    pub is_paid: bool,
    pub description: Option<String>,
}
