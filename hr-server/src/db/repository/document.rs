//! Employee Document Repository

use super::{RepoError, RepoResult};
use shared::models::EmployeeDocument;
use sqlx::SqlitePool;

const DOCUMENT_SELECT: &str = "SELECT id, employee_id, document_type, file_name, file_path, file_size, description, uploaded_by, uploaded_at FROM employee_documents";

/// Lookup scoped to the owning employee so a document id from another
/// profile reads as missing, not as someone else's file.
pub async fn find_for_employee(
    pool: &SqlitePool,
    document_id: i64,
    employee_id: i64,
) -> RepoResult<Option<EmployeeDocument>> {
    let sql = format!("{} WHERE id = ? AND employee_id = ?", DOCUMENT_SELECT);
    let row = sqlx::query_as::<_, EmployeeDocument>(&sql)
        .bind(document_id)
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    employee_id: i64,
    document_type: &str,
    file_name: &str,
    file_path: &str,
    file_size: i64,
    description: Option<&str>,
    uploaded_by: i64,
) -> RepoResult<EmployeeDocument> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO employee_documents (id, employee_id, document_type, file_name, file_path, file_size, description, uploaded_by, uploaded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(document_type)
    .bind(file_name)
    .bind(file_path)
    .bind(file_size)
    .bind(description)
    .bind(uploaded_by)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record document".into()))
}

async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<EmployeeDocument>> {
    let sql = format!("{} WHERE id = ?", DOCUMENT_SELECT);
    let row = sqlx::query_as::<_, EmployeeDocument>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
