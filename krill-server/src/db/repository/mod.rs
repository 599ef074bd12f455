//! Repository Module
//!
//! Free async functions over `&SqlitePool`, one module per table. All
//! company-owned tables are queried with the caller's `company_id` so that
//! cross-tenant rows are indistinguishable from absent rows.

// Tenant
pub mod company;
pub mod work_schedule;

// People
pub mod employee;

// Leave
pub mod leave_type;
pub mod leave_balance;
pub mod leave_request;

// Payroll
pub mod salary_slip;
pub mod fixed_deduction;

// Calendar
pub mod calendar_event;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) => {
                let msg = db.message();
                // SQLITE_BUSY / SQLITE_LOCKED surface as transient
                if msg.contains("locked") || msg.contains("busy") {
                    RepoError::Unavailable(msg.to_string())
                } else {
                    RepoError::Database(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => {
                RepoError::Unavailable("connection pool timed out".to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
