//! Database Module
//!
//! Handles the SQLite connection pool, migrations, and the transient-failure
//! retry policy shared by the ledger and payroll paths.

pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::utils::AppError;
use repository::{RepoError, RepoResult};

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and apply migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        // Run migrations (ignore previously applied but now removed migrations)
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

/// 有界重试 + 退避
///
/// Store calls can fail transiently (busy/locked database, pool timeout).
/// Each attempt that surfaces [`RepoError::Unavailable`] is retried with
/// doubling backoff; after the last attempt the error is returned as-is so
/// handlers map it to HTTP 503 — distinct from validation and not-found.
pub async fn with_retry<T, F, Fut>(mut op: F) -> RepoResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = RepoResult<T>>,
{
    const MAX_ATTEMPTS: u32 = 3;
    let mut delay = Duration::from_millis(50);

    for attempt in 1..=MAX_ATTEMPTS {
        match op().await {
            Err(RepoError::Unavailable(msg)) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    "Transient store failure (attempt {attempt}/{MAX_ATTEMPTS}): {msg}, retrying in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            other => return other,
        }
    }
    unreachable!("retry loop always returns on the last attempt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_db_service_applies_migrations_on_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("krill.db");

        let service = DbService::new(&db_path.to_string_lossy()).await.unwrap();

        // Seeded catalog proves the migration ran
        let types = repository::leave_type::find_all(&service.pool).await.unwrap();
        assert_eq!(types.len(), 3);
        assert!(types.iter().any(|t| t.name == "Personal Leave" && !t.is_paid));

        // Reopening the same file is fine (migrations are versioned)
        drop(service);
        let reopened = DbService::new(&db_path.to_string_lossy()).await.unwrap();
        let types = repository::leave_type::find_all(&reopened.pool).await.unwrap();
        assert_eq!(types.len(), 3);
    }

    #[tokio::test]
    async fn test_with_retry_passes_through_non_transient_errors() {
        let result: RepoResult<()> = with_retry(|| async {
            Err(RepoError::NotFound("nope".to_string()))
        })
        .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_with_retry_retries_transient_then_succeeds() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let attempts = AtomicU32::new(0);
        let result = with_retry(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(RepoError::Unavailable("database is locked".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_surfaces_unavailable_after_exhaustion() {
        let result: RepoResult<()> =
            with_retry(|| async { Err(RepoError::Unavailable("busy".to_string())) }).await;
        assert!(matches!(result, Err(RepoError::Unavailable(_))));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory pools and seed helpers shared by repository and domain tests.

    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory SQLite pool with the full migrated schema.
    ///
    /// Single connection: every `sqlite::memory:` connection is its own
    /// database, so the pool must not open a second one.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    /// Seed a company and return its id.
    pub async fn seed_company(pool: &SqlitePool, name: &str) -> i64 {
        let company = super::repository::company::create(
            pool,
            shared::models::CompanyCreate {
                name: name.to_string(),
            },
        )
        .await
        .unwrap();
        company.id
    }

    /// Seed an active employee and return it.
    pub async fn seed_employee(
        pool: &SqlitePool,
        company_id: i64,
        full_name: &str,
        joining_date: &str,
        salary: f64,
        leave_entitlement: i64,
    ) -> shared::models::Employee {
        super::repository::employee::create(
            pool,
            company_id,
            None,
            shared::models::EmployeeCreate {
                full_name: full_name.to_string(),
                email: format!("{}@example.com", full_name.to_lowercase().replace(' ', ".")),
                joining_date: joining_date.to_string(),
                salary,
                leave_entitlement,
                team_lead_id: None,
                account_id: None,
            },
        )
        .await
        .unwrap()
    }
}
