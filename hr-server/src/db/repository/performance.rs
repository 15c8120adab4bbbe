//! Performance Review Repository

use super::{RepoError, RepoResult};
use shared::models::{PerformanceReview, PerformanceReviewCreate};
use sqlx::SqlitePool;

const REVIEW_SELECT: &str = "SELECT id, employee_id, reviewer_id, review_period_start, review_period_end, overall_rating, comments, status, created_at, updated_at FROM performance_reviews";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PerformanceReview>> {
    let sql = format!("{} WHERE id = ?", REVIEW_SELECT);
    let row = sqlx::query_as::<_, PerformanceReview>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    data: &PerformanceReviewCreate,
) -> RepoResult<PerformanceReview> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO performance_reviews (id, employee_id, reviewer_id, review_period_start, review_period_end, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', ?6, ?6)",
    )
    .bind(id)
    .bind(data.employee_id)
    .bind(data.reviewer_id)
    .bind(&data.review_period_start)
    .bind(&data.review_period_end)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create performance review".into()))
}

/// Records feedback and closes the review. Missing rating or comments
/// leave the stored value untouched; the status flips regardless.
pub async fn apply_feedback(
    pool: &SqlitePool,
    id: i64,
    overall_rating: Option<f64>,
    comments: Option<&str>,
) -> RepoResult<PerformanceReview> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE performance_reviews SET overall_rating = COALESCE(?1, overall_rating), comments = COALESCE(?2, comments), status = 'COMPLETED', updated_at = ?3 WHERE id = ?4",
    )
    .bind(overall_rating)
    .bind(comments)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Performance review {id} not found"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload performance review".into()))
}

/// Open reviews assigned to one reviewer, oldest cycle first.
pub async fn list_pending_by_reviewer(
    pool: &SqlitePool,
    reviewer_id: i64,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<PerformanceReview>> {
    let sql = format!(
        "{} WHERE reviewer_id = ? AND status = 'PENDING' ORDER BY review_period_end, id LIMIT ? OFFSET ?",
        REVIEW_SELECT
    );
    let rows = sqlx::query_as::<_, PerformanceReview>(&sql)
        .bind(reviewer_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
