//! Training Repository

use super::{RepoError, RepoResult};
use shared::models::{TrainingCourse, TrainingCourseCreate, TrainingEnrollment};
use sqlx::SqlitePool;

const COURSE_SELECT: &str = "SELECT id, title, description, duration_hours, instructor, is_active, created_at FROM training_courses";

const ENROLLMENT_SELECT: &str = "SELECT id, employee_id, course_id, enrollment_date, completion_date, status, score, created_at FROM training_enrollments";

pub async fn find_course_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TrainingCourse>> {
    let sql = format!("{} WHERE id = ?", COURSE_SELECT);
    let row = sqlx::query_as::<_, TrainingCourse>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_active_courses(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<TrainingCourse>> {
    let sql = format!(
        "{} WHERE is_active = 1 ORDER BY title LIMIT ? OFFSET ?",
        COURSE_SELECT
    );
    let rows = sqlx::query_as::<_, TrainingCourse>(&sql)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_course(
    pool: &SqlitePool,
    data: &TrainingCourseCreate,
) -> RepoResult<TrainingCourse> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO training_courses (id, title, description, duration_hours, instructor, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.duration_hours)
    .bind(&data.instructor)
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await?;
    find_course_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create training course".into()))
}

pub async fn find_enrollment(
    pool: &SqlitePool,
    employee_id: i64,
    course_id: i64,
) -> RepoResult<Option<TrainingEnrollment>> {
    let sql = format!(
        "{} WHERE employee_id = ? AND course_id = ?",
        ENROLLMENT_SELECT
    );
    let row = sqlx::query_as::<_, TrainingEnrollment>(&sql)
        .bind(employee_id)
        .bind(course_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_enrollments(
    pool: &SqlitePool,
    employee_id: i64,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<TrainingEnrollment>> {
    let sql = format!(
        "{} WHERE employee_id = ? ORDER BY enrollment_date DESC, id DESC LIMIT ? OFFSET ?",
        ENROLLMENT_SELECT
    );
    let rows = sqlx::query_as::<_, TrainingEnrollment>(&sql)
        .bind(employee_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_enrollment(
    pool: &SqlitePool,
    employee_id: i64,
    course_id: i64,
    enrollment_date: &str,
) -> RepoResult<TrainingEnrollment> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO training_enrollments (id, employee_id, course_id, enrollment_date, status, created_at) VALUES (?1, ?2, ?3, ?4, 'ENROLLED', ?5)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(course_id)
    .bind(enrollment_date)
    .bind(now)
    .execute(pool)
    .await?;
    let sql = format!("{} WHERE id = ?", ENROLLMENT_SELECT);
    let row = sqlx::query_as::<_, TrainingEnrollment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create enrollment".into()))
}
