//! Position Repository

use super::{RepoError, RepoResult};
use shared::models::{Position, PositionCreate};
use sqlx::SqlitePool;

const POSITION_SELECT: &str =
    "SELECT id, title, code, description, level, created_at FROM positions";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Position>> {
    let sql = format!("{} WHERE id = ?", POSITION_SELECT);
    let row = sqlx::query_as::<_, Position>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Position>> {
    let sql = format!("{} ORDER BY title", POSITION_SELECT);
    let rows = sqlx::query_as::<_, Position>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &PositionCreate) -> RepoResult<Position> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO positions (id, title, code, description, level, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.code)
    .bind(&data.description)
    .bind(&data.level)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create position".into()))
}
