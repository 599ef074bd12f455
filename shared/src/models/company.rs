//! Company Model
//!
//! The tenant boundary. Every business row carries a `company_id` and every
//! query is scoped to it.

use serde::{Deserialize, Serialize};

/// Company entity (租户)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create company payload (signup)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
}
