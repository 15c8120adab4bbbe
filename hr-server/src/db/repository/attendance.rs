//! Attendance Repository
//!
//! 班次与考勤打卡记录。同一员工同一天最多一条未关闭记录
//! (clock_in 已设置而 clock_out 为空)。

use super::{RepoError, RepoResult};
use shared::models::{AttendanceRecord, GeoLocation, Shift};
use sqlx::SqlitePool;
use sqlx::types::Json;

const SHIFT_SELECT: &str =
    "SELECT id, name, start_time, end_time, is_active, created_at FROM shifts";

const RECORD_SELECT: &str = "SELECT id, employee_id, shift_id, date, clock_in, clock_out, status, hours_worked, geo_location, notes, is_reviewed, reviewed_by, created_at, updated_at FROM attendance_records";

pub async fn list_active_shifts(pool: &SqlitePool) -> RepoResult<Vec<Shift>> {
    let sql = format!("{} WHERE is_active = 1 ORDER BY start_time", SHIFT_SELECT);
    let rows = sqlx::query_as::<_, Shift>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_record_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!("{} WHERE id = ?", RECORD_SELECT);
    let row = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The employee's still-open record for `date`, if any.
pub async fn find_open_record(
    pool: &SqlitePool,
    employee_id: i64,
    date: &str,
) -> RepoResult<Option<AttendanceRecord>> {
    let sql = format!(
        "{} WHERE employee_id = ? AND date = ? AND clock_out IS NULL",
        RECORD_SELECT
    );
    let row = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_clock_in(
    pool: &SqlitePool,
    employee_id: i64,
    date: &str,
    clock_in: i64,
    geo_location: Option<&GeoLocation>,
) -> RepoResult<AttendanceRecord> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO attendance_records (id, employee_id, shift_id, date, clock_in, clock_out, status, hours_worked, geo_location, notes, is_reviewed, created_at, updated_at) VALUES (?1, ?2, NULL, ?3, ?4, NULL, 'PRESENT', 0, ?5, NULL, 0, ?6, ?6)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(date)
    .bind(clock_in)
    .bind(geo_location.map(Json))
    .bind(now)
    .execute(pool)
    .await?;
    find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create attendance record".into()))
}

pub async fn close_record(
    pool: &SqlitePool,
    id: i64,
    clock_out: i64,
    hours_worked: f64,
) -> RepoResult<AttendanceRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE attendance_records SET clock_out = ?1, hours_worked = ?2, updated_at = ?3 WHERE id = ?4 AND clock_out IS NULL",
    )
    .bind(clock_out)
    .bind(hours_worked)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Open attendance record {id} not found"
        )));
    }
    find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload attendance record".into()))
}

/// Record history for one employee inside a date window, newest first.
pub async fn list_records(
    pool: &SqlitePool,
    employee_id: i64,
    start_date: &str,
    end_date: &str,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "{} WHERE employee_id = ?1 AND date >= ?2 AND date <= ?3 ORDER BY date DESC LIMIT ?4 OFFSET ?5",
        RECORD_SELECT
    );
    let rows = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(start_date)
        .bind(end_date)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Records awaiting review. A manager sees their direct reports only;
/// `manager_id = None` is the HR-wide view.
pub async fn list_unreviewed(
    pool: &SqlitePool,
    manager_id: Option<i64>,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = "SELECT r.id, r.employee_id, r.shift_id, r.date, r.clock_in, r.clock_out, r.status, r.hours_worked, r.geo_location, r.notes, r.is_reviewed, r.reviewed_by, r.created_at, r.updated_at \
         FROM attendance_records r JOIN employees e ON e.id = r.employee_id \
         WHERE r.is_reviewed = 0 AND (?1 IS NULL OR e.manager_id = ?1) \
         ORDER BY r.date DESC LIMIT ?2 OFFSET ?3";
    let rows = sqlx::query_as::<_, AttendanceRecord>(sql)
        .bind(manager_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Applies a correction in one step: new clock-in, recomputed hours
/// when the record is already closed, and an immediate reviewed mark.
pub async fn apply_adjustment(
    pool: &SqlitePool,
    id: i64,
    clock_in: i64,
    hours_worked: Option<f64>,
    notes: &str,
    reviewed_by: i64,
) -> RepoResult<AttendanceRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE attendance_records SET clock_in = ?1, hours_worked = COALESCE(?2, hours_worked), notes = ?3, is_reviewed = 1, reviewed_by = ?4, updated_at = ?5 WHERE id = ?6",
    )
    .bind(clock_in)
    .bind(hours_worked)
    .bind(notes)
    .bind(reviewed_by)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Attendance record {id} not found"
        )));
    }
    find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload attendance record".into()))
}

/// Notes the requested correction; nothing else on the record changes.
pub async fn propose_adjustment(
    pool: &SqlitePool,
    id: i64,
    notes: &str,
) -> RepoResult<AttendanceRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE attendance_records SET notes = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Attendance record {id} not found"
        )));
    }
    find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload attendance record".into()))
}

pub async fn mark_reviewed(
    pool: &SqlitePool,
    id: i64,
    reviewed_by: i64,
) -> RepoResult<AttendanceRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE attendance_records SET is_reviewed = 1, reviewed_by = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(reviewed_by)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Attendance record {id} not found"
        )));
    }
    find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload attendance record".into()))
}
