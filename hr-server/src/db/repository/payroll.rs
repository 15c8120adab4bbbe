//! Payroll Repository
//!
//! 工资单批次与个人工资条。批次状态机: PENDING → PROCESSING →
//! COMPLETED | FAILED, 状态迁移使用带守卫的 UPDATE。

use super::{RepoError, RepoResult};
use shared::models::{PayrollRun, PayrollStatus, Payslip};
use sqlx::SqlitePool;

const RUN_SELECT: &str = "SELECT id, period_start, period_end, status, total_amount, processed_by, processed_at, created_at FROM payroll_runs";

const PAYSLIP_SELECT: &str = "SELECT id, employee_id, payroll_run_id, basic_salary, allowances, deductions, tax, net_salary, currency, file_path, created_at FROM payslips";

pub async fn find_run_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PayrollRun>> {
    let sql = format!("{} WHERE id = ?", RUN_SELECT);
    let row = sqlx::query_as::<_, PayrollRun>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Any run whose closed period intersects [period_start, period_end].
/// Status does not matter: even a FAILED run blocks the period.
pub async fn find_overlapping_run(
    pool: &SqlitePool,
    period_start: &str,
    period_end: &str,
) -> RepoResult<Option<PayrollRun>> {
    let sql = format!(
        "{} WHERE period_start <= ?2 AND period_end >= ?1 LIMIT 1",
        RUN_SELECT
    );
    let row = sqlx::query_as::<_, PayrollRun>(&sql)
        .bind(period_start)
        .bind(period_end)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_runs(pool: &SqlitePool, skip: i64, limit: i64) -> RepoResult<Vec<PayrollRun>> {
    let sql = format!("{} ORDER BY created_at DESC LIMIT ? OFFSET ?", RUN_SELECT);
    let rows = sqlx::query_as::<_, PayrollRun>(&sql)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create_run(
    pool: &SqlitePool,
    period_start: &str,
    period_end: &str,
    processed_by: i64,
) -> RepoResult<PayrollRun> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO payroll_runs (id, period_start, period_end, status, total_amount, processed_by, created_at) VALUES (?1, ?2, ?3, 'PENDING', 0, ?4, ?5)",
    )
    .bind(id)
    .bind(period_start)
    .bind(period_end)
    .bind(processed_by)
    .bind(now)
    .execute(pool)
    .await?;
    find_run_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payroll run".into()))
}

/// Claims a PENDING run for processing. Returns false when another
/// worker already claimed it or the run vanished.
pub async fn claim_run(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE payroll_runs SET status = 'PROCESSING' WHERE id = ? AND status = 'PENDING'",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn complete_run(pool: &SqlitePool, id: i64, total_amount: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE payroll_runs SET status = 'COMPLETED', total_amount = ?1, processed_at = ?2 WHERE id = ?3",
    )
    .bind(total_amount)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payroll run {id} not found")));
    }
    Ok(())
}

pub async fn fail_run(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE payroll_runs SET status = 'FAILED', processed_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payroll run {id} not found")));
    }
    Ok(())
}

/// Webhook-driven status override, no guard on the previous state.
pub async fn set_run_status(pool: &SqlitePool, id: i64, status: PayrollStatus) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE payroll_runs SET status = ?1, processed_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payroll run {id} not found")));
    }
    Ok(())
}

pub async fn find_payslip(
    pool: &SqlitePool,
    payslip_id: i64,
    employee_id: i64,
) -> RepoResult<Option<Payslip>> {
    let sql = format!("{} WHERE id = ? AND employee_id = ?", PAYSLIP_SELECT);
    let row = sqlx::query_as::<_, Payslip>(&sql)
        .bind(payslip_id)
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list_payslips(
    pool: &SqlitePool,
    employee_id: i64,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<Payslip>> {
    let sql = format!(
        "{} WHERE employee_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        PAYSLIP_SELECT
    );
    let rows = sqlx::query_as::<_, Payslip>(&sql)
        .bind(employee_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_payslip(
    pool: &SqlitePool,
    employee_id: i64,
    payroll_run_id: i64,
    basic_salary: f64,
    allowances: f64,
    deductions: f64,
    tax: f64,
    net_salary: f64,
    currency: &str,
) -> RepoResult<Payslip> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO payslips (id, employee_id, payroll_run_id, basic_salary, allowances, deductions, tax, net_salary, currency, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(payroll_run_id)
    .bind(basic_salary)
    .bind(allowances)
    .bind(deductions)
    .bind(tax)
    .bind(net_salary)
    .bind(currency)
    .bind(now)
    .execute(pool)
    .await?;
    let sql = format!("{} WHERE id = ?", PAYSLIP_SELECT);
    let row = sqlx::query_as::<_, Payslip>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create payslip".into()))
}
