//! Department Repository

use super::{RepoError, RepoResult};
use shared::models::{Department, DepartmentCreate};
use sqlx::SqlitePool;

const DEPARTMENT_SELECT: &str =
    "SELECT id, name, code, description, location, head_id, created_at FROM departments";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Department>> {
    let sql = format!("{} WHERE id = ?", DEPARTMENT_SELECT);
    let row = sqlx::query_as::<_, Department>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Department>> {
    let sql = format!("{} WHERE name = ?", DEPARTMENT_SELECT);
    let row = sqlx::query_as::<_, Department>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Department>> {
    let sql = format!("{} ORDER BY name", DEPARTMENT_SELECT);
    let rows = sqlx::query_as::<_, Department>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &DepartmentCreate) -> RepoResult<Department> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO departments (id, name, code, description, location, head_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.code)
    .bind(&data.description)
    .bind(&data.location)
    .bind(data.head_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create department".into()))
}
