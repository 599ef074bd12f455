//! Company Repository

use super::{RepoError, RepoResult};
use shared::models::{Company, CompanyCreate};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Company>> {
    let company = sqlx::query_as::<_, Company>(
        "SELECT id, name, created_at, updated_at FROM company WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(company)
}

pub async fn create(pool: &SqlitePool, data: CompanyCreate) -> RepoResult<Company> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query("INSERT INTO company (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)")
        .bind(id)
        .bind(&data.name)
        .bind(now)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create company".into()))
}
