//! Report Aggregation Queries
//!
//! 报表聚合查询。只读, 不产生任何行级写入。

use super::RepoResult;
use sqlx::SqlitePool;

/// Flat employee row for the CSV export, names already resolved.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeExportRow {
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub status: String,
}

pub async fn count_employees(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn count_active_employees(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM employees WHERE employment_status = 'ACTIVE'")
            .fetch_one(pool)
            .await?;
    Ok(n)
}

pub async fn count_inactive_employees(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM employees WHERE employment_status != 'ACTIVE'")
            .fetch_one(pool)
            .await?;
    Ok(n)
}

pub async fn count_by_department(pool: &SqlitePool) -> RepoResult<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT d.name, COUNT(e.id) FROM departments d JOIN employees e ON e.department_id = d.id GROUP BY d.name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_by_position(pool: &SqlitePool) -> RepoResult<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT p.title, COUNT(e.id) FROM positions p JOIN employees e ON e.position_id = p.id GROUP BY p.title",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Headcount at period start: hired strictly before the date and still
/// ACTIVE today.
pub async fn count_active_hired_before(pool: &SqlitePool, date: &str) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM employees WHERE hire_date < ? AND employment_status = 'ACTIVE'",
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

/// TERMINATED employees whose profile last changed inside the window.
pub async fn count_terminated_between(
    pool: &SqlitePool,
    start_ms: i64,
    end_ms: i64,
) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM employees WHERE employment_status = 'TERMINATED' AND updated_at >= ? AND updated_at < ?",
    )
    .bind(start_ms)
    .bind(end_ms)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn sum_approved_leave_days(pool: &SqlitePool, year: i64) -> RepoResult<f64> {
    let (total,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_days), 0.0) FROM leave_requests WHERE status = 'APPROVED' AND substr(start_date, 1, 4) = ?",
    )
    .bind(year.to_string())
    .fetch_one(pool)
    .await?;
    Ok(total)
}

pub async fn sum_approved_leave_days_by_type(
    pool: &SqlitePool,
    year: i64,
) -> RepoResult<Vec<(i64, f64)>> {
    let rows: Vec<(i64, f64)> = sqlx::query_as(
        "SELECT leave_type_id, SUM(total_days) FROM leave_requests WHERE status = 'APPROVED' AND substr(start_date, 1, 4) = ? GROUP BY leave_type_id",
    )
    .bind(year.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_absences(
    pool: &SqlitePool,
    start_date: &str,
    end_date: &str,
) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM attendance_records WHERE date >= ? AND date <= ? AND status = 'ABSENT'",
    )
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub async fn list_employee_export_rows(pool: &SqlitePool) -> RepoResult<Vec<EmployeeExportRow>> {
    let rows = sqlx::query_as::<_, EmployeeExportRow>(
        "SELECT e.employee_number, e.first_name, e.last_name, e.email, COALESCE(d.name, '') AS department, COALESCE(p.title, '') AS position, e.employment_status AS status \
         FROM employees e \
         LEFT JOIN departments d ON d.id = e.department_id \
         LEFT JOIN positions p ON p.id = e.position_id \
         ORDER BY e.employee_number",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
