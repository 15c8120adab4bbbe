//! Payroll Processing Service
//!
//! 工资批次计算。由后台 worker 消费 [`Job::ProcessPayroll`] 时调用,
//! 金额一经写入不再重算。
//!
//! [`Job::ProcessPayroll`]: super::Job::ProcessPayroll

use shared::util::round2;
use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::repository::{self, RepoResult};
use crate::services::NotifierService;

/// Processes one payroll run end to end and reports the outcome to the
/// external payroll service. Never returns an error: a failed run is
/// marked FAILED and logged.
pub async fn process_run(
    pool: &SqlitePool,
    config: &Config,
    notifier: &NotifierService,
    run_id: i64,
) {
    match repository::payroll::claim_run(pool, run_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(run_id, "Payroll run is not PENDING, skipping");
            return;
        }
        Err(e) => {
            tracing::error!(run_id, error = %e, "Failed to claim payroll run");
            return;
        }
    }

    match generate_payslips(pool, config, run_id).await {
        Ok(total_amount) => {
            tracing::info!(run_id, total_amount, "Payroll run completed");
            notifier
                .notify_payroll_status(run_id, "success", Some(total_amount))
                .await;
        }
        Err(e) => {
            tracing::error!(run_id, error = %e, "Payroll run failed");
            if let Err(e) = repository::payroll::fail_run(pool, run_id).await {
                tracing::error!(run_id, error = %e, "Failed to mark payroll run as FAILED");
            }
            notifier.notify_payroll_status(run_id, "failure", None).await;
        }
    }
}

/// One payslip per ACTIVE salaried employee; returns the run total.
async fn generate_payslips(pool: &SqlitePool, config: &Config, run_id: i64) -> RepoResult<f64> {
    let employees = repository::employee::list_active_paid(pool).await?;

    let mut total_amount = 0.0;
    for employee in &employees {
        let Some(basic_salary) = employee.salary else {
            continue;
        };
        let allowances = round2(basic_salary * config.allowance_rate);
        let tax = round2(basic_salary * config.tax_rate);
        let deductions = round2(basic_salary * config.deduction_rate);
        let net_salary = round2(basic_salary + allowances - tax - deductions);

        repository::payroll::create_payslip(
            pool,
            employee.id,
            run_id,
            basic_salary,
            allowances,
            deductions,
            tax,
            net_salary,
            &employee.currency,
        )
        .await?;
        total_amount += net_salary;
    }
    let total_amount = round2(total_amount);

    repository::payroll::complete_run(pool, run_id, total_amount).await?;
    Ok(total_amount)
}
