//! Leave Repository
//!
//! 请假类型、余额台账与请假申请的数据访问层。
//! 余额维持 `available_days = total_days - used_days` 不变式。

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use shared::models::{
    LeaveBalance, LeaveBalanceDetail, LeaveRequest, LeaveRequestStatus, LeaveType, LeaveTypeCreate,
};
use sqlx::SqlitePool;

const LEAVE_TYPE_SELECT: &str = "SELECT id, name, code, description, max_days_per_year, is_paid, requires_approval, is_active, created_at FROM leave_types";

const LEAVE_BALANCE_SELECT: &str = "SELECT id, employee_id, leave_type_id, year, total_days, used_days, available_days, updated_at FROM leave_balances";

const LEAVE_REQUEST_SELECT: &str = "SELECT id, employee_id, leave_type_id, start_date, end_date, total_days, reason, status, approved_by, approval_comment, approved_at, created_at, updated_at FROM leave_requests";

// ========== Leave types ==========

pub async fn find_type_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LeaveType>> {
    let sql = format!("{} WHERE id = ?", LEAVE_TYPE_SELECT);
    let row = sqlx::query_as::<_, LeaveType>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_type_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<LeaveType>> {
    let sql = format!("{} WHERE name = ?", LEAVE_TYPE_SELECT);
    let row = sqlx::query_as::<_, LeaveType>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_active_types(pool: &SqlitePool) -> RepoResult<Vec<LeaveType>> {
    let sql = format!("{} WHERE is_active = 1 ORDER BY name", LEAVE_TYPE_SELECT);
    let rows = sqlx::query_as::<_, LeaveType>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create_type(pool: &SqlitePool, data: &LeaveTypeCreate) -> RepoResult<LeaveType> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO leave_types (id, name, code, description, max_days_per_year, is_paid, requires_approval, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.code)
    .bind(&data.description)
    .bind(data.max_days_per_year)
    .bind(data.is_paid)
    .bind(data.requires_approval)
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await?;
    find_type_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave type".into()))
}

// ========== Balances ==========

pub async fn find_balance(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type_id: i64,
    year: i64,
) -> RepoResult<Option<LeaveBalance>> {
    let sql = format!(
        "{} WHERE employee_id = ? AND leave_type_id = ? AND year = ?",
        LEAVE_BALANCE_SELECT
    );
    let row = sqlx::query_as::<_, LeaveBalance>(&sql)
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All balances of one employee for a year, each with its type resolved.
pub async fn list_balances(
    pool: &SqlitePool,
    employee_id: i64,
    year: i64,
) -> RepoResult<Vec<LeaveBalanceDetail>> {
    let sql = format!(
        "{} WHERE employee_id = ? AND year = ? ORDER BY leave_type_id",
        LEAVE_BALANCE_SELECT
    );
    let balances = sqlx::query_as::<_, LeaveBalance>(&sql)
        .bind(employee_id)
        .bind(year)
        .fetch_all(pool)
        .await?;

    let types: Vec<LeaveType> = sqlx::query_as::<_, LeaveType>(LEAVE_TYPE_SELECT)
        .fetch_all(pool)
        .await?;
    let mut by_id: HashMap<i64, LeaveType> = types.into_iter().map(|t| (t.id, t)).collect();

    Ok(balances
        .into_iter()
        .map(|balance| {
            let leave_type = by_id.remove(&balance.leave_type_id);
            LeaveBalanceDetail {
                balance,
                leave_type,
            }
        })
        .collect())
}

/// Creates or replaces the entitlement for (employee, type, year).
/// `used_days` survives a re-grant; `available_days` is recomputed.
pub async fn upsert_balance(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type_id: i64,
    year: i64,
    total_days: f64,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO leave_balances (id, employee_id, leave_type_id, year, total_days, used_days, available_days, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?5, ?6) \
         ON CONFLICT (employee_id, leave_type_id, year) DO UPDATE SET \
         total_days = excluded.total_days, \
         available_days = excluded.total_days - leave_balances.used_days, \
         updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .bind(total_days)
    .bind(now)
    .execute(pool)
    .await?;
    find_balance(pool, employee_id, leave_type_id, year)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to grant leave balance".into()))
}

/// Books `days` against the ledger. Returns false when no ledger row
/// exists, which callers treat as an uncapped type.
pub async fn debit_balance(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type_id: i64,
    year: i64,
    days: f64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE leave_balances SET used_days = used_days + ?1, available_days = total_days - (used_days + ?1), updated_at = ?2 WHERE employee_id = ?3 AND leave_type_id = ?4 AND year = ?5",
    )
    .bind(days)
    .bind(now)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

// ========== Requests ==========

pub async fn find_request_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LeaveRequest>> {
    let sql = format!("{} WHERE id = ?", LEAVE_REQUEST_SELECT);
    let row = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_requests_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    status: Option<LeaveRequestStatus>,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<LeaveRequest>> {
    let sql = format!(
        "{} WHERE employee_id = ?1 AND (?2 IS NULL OR status = ?2) ORDER BY created_at DESC LIMIT ?3 OFFSET ?4",
        LEAVE_REQUEST_SELECT
    );
    let rows = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(employee_id)
        .bind(status)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Requests awaiting a manager's decision. `manager_id = None` widens
/// the view to the whole company (HR admin).
pub async fn list_team_requests(
    pool: &SqlitePool,
    manager_id: Option<i64>,
    status: Option<LeaveRequestStatus>,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<LeaveRequest>> {
    let sql = "SELECT r.id, r.employee_id, r.leave_type_id, r.start_date, r.end_date, r.total_days, r.reason, r.status, r.approved_by, r.approval_comment, r.approved_at, r.created_at, r.updated_at \
         FROM leave_requests r JOIN employees e ON e.id = r.employee_id \
         WHERE (?1 IS NULL OR e.manager_id = ?1) AND (?2 IS NULL OR r.status = ?2) \
         ORDER BY r.created_at DESC LIMIT ?3 OFFSET ?4";
    let rows = sqlx::query_as::<_, LeaveRequest>(sql)
        .bind(manager_id)
        .bind(status)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_request(
    pool: &SqlitePool,
    employee_id: i64,
    leave_type_id: i64,
    start_date: &str,
    end_date: &str,
    total_days: f64,
    reason: Option<&str>,
) -> RepoResult<LeaveRequest> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO leave_requests (id, employee_id, leave_type_id, start_date, end_date, total_days, reason, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'PENDING', ?8, ?8)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(start_date)
    .bind(end_date)
    .bind(total_days)
    .bind(reason)
    .bind(now)
    .execute(pool)
    .await?;
    find_request_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create leave request".into()))
}

/// Moves a PENDING request to APPROVED or REJECTED. The status guard in
/// the WHERE clause makes concurrent decisions lose cleanly: the second
/// one affects zero rows.
pub async fn decide_request(
    pool: &SqlitePool,
    id: i64,
    status: LeaveRequestStatus,
    approved_by: i64,
    comment: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE leave_requests SET status = ?1, approved_by = ?2, approval_comment = ?3, approved_at = ?4, updated_at = ?4 WHERE id = ?5 AND status = 'PENDING'",
    )
    .bind(status)
    .bind(approved_by)
    .bind(comment)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Cancels a PENDING request; same guarded-update shape as
/// [`decide_request`].
pub async fn cancel_request(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE leave_requests SET status = 'CANCELLED', updated_at = ?1 WHERE id = ?2 AND status = 'PENDING'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
