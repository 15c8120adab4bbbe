//! Payroll run processing, overlap detection, and compensation history.

mod common;

use std::time::Duration;

use common::{seed_employee, seed_user, test_server};
use hr_server::db::DbService;
use hr_server::db::repository::{employee, payroll};
use hr_server::services::{Job, NotifierService, payroll as payroll_service};
use hr_server::{Config, ServerState};
use shared::models::{EmployeeUpdate, EmploymentStatus, PayrollStatus, UserRole};

fn offline_config() -> Config {
    let mut config = Config::default();
    config.payroll_service_url = "http://127.0.0.1:1/api".into();
    config.calendar_service_url = "http://127.0.0.1:1/api".into();
    config
}

#[tokio::test]
async fn overlapping_periods_are_detected() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let admin = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;

    payroll::create_run(pool, "2026-01-01", "2026-01-31", admin.id)
        .await
        .expect("january run");

    // Any intersection with an existing period counts.
    for (start, end) in [
        ("2026-01-15", "2026-02-15"),
        ("2025-12-20", "2026-01-05"),
        ("2026-01-10", "2026-01-20"),
        ("2026-01-01", "2026-01-31"),
    ] {
        let hit = payroll::find_overlapping_run(pool, start, end)
            .await
            .expect("overlap query");
        assert!(hit.is_some(), "{start}..{end} should overlap");
    }

    // The adjacent month does not.
    let clear = payroll::find_overlapping_run(pool, "2026-02-01", "2026-02-28")
        .await
        .expect("overlap query");
    assert!(clear.is_none());
}

#[tokio::test]
async fn claiming_a_run_is_single_shot() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let admin = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;

    let run = payroll::create_run(pool, "2026-01-01", "2026-01-31", admin.id)
        .await
        .expect("create run");
    assert_eq!(run.status, PayrollStatus::Pending);

    assert!(payroll::claim_run(pool, run.id).await.expect("claim"));
    assert!(!payroll::claim_run(pool, run.id).await.expect("reclaim"));

    let run = payroll::find_run_by_id(pool, run.id)
        .await
        .expect("reload")
        .expect("exists");
    assert_eq!(run.status, PayrollStatus::Processing);
}

#[tokio::test]
async fn processing_pays_every_active_salaried_employee() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let config = offline_config();
    let notifier = NotifierService::new(&config);
    let admin = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;

    let paid = seed_employee(pool, "EMP001", None, Some(1000.0)).await;
    let senior = seed_employee(pool, "EMP002", None, Some(2000.0)).await;
    // No salary on file and a terminated employee: both sit out the run.
    seed_employee(pool, "EMP003", None, None).await;
    let gone = seed_employee(pool, "EMP004", None, Some(5000.0)).await;
    employee::update(
        pool,
        gone.id,
        &EmployeeUpdate {
            employment_status: Some(EmploymentStatus::Terminated),
            ..Default::default()
        },
    )
    .await
    .expect("terminate");

    let run = payroll::create_run(pool, "2026-01-01", "2026-01-31", admin.id)
        .await
        .expect("create run");
    payroll_service::process_run(pool, &config, &notifier, run.id).await;

    let run = payroll::find_run_by_id(pool, run.id)
        .await
        .expect("reload")
        .expect("exists");
    assert_eq!(run.status, PayrollStatus::Completed);
    assert_eq!(run.total_amount, 2700.0);
    assert!(run.processed_at.is_some());

    // 1000 basic with the default 10% allowance, 15% tax, 5% deduction.
    let slips = payroll::list_payslips(pool, paid.id, 0, 10).await.expect("slips");
    assert_eq!(slips.len(), 1);
    let slip = &slips[0];
    assert_eq!(slip.basic_salary, 1000.0);
    assert_eq!(slip.allowances, 100.0);
    assert_eq!(slip.tax, 150.0);
    assert_eq!(slip.deductions, 50.0);
    assert_eq!(slip.net_salary, 900.0);
    assert_eq!(slip.currency, "USD");

    let slips = payroll::list_payslips(pool, senior.id, 0, 10).await.expect("slips");
    assert_eq!(slips.len(), 1);
    assert_eq!(slips[0].net_salary, 1800.0);

    // Completed runs are not picked up again; no duplicate payslips.
    payroll_service::process_run(pool, &config, &notifier, run.id).await;
    let slips = payroll::list_payslips(pool, paid.id, 0, 10).await.expect("slips");
    assert_eq!(slips.len(), 1);
}

#[tokio::test]
async fn processing_an_unknown_run_is_harmless() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let config = offline_config();
    let notifier = NotifierService::new(&config);

    payroll_service::process_run(pool, &config, &notifier, 424242).await;
}

#[tokio::test]
async fn background_worker_drains_enqueued_runs() {
    let server = test_server().await;
    let state = &server.state;
    let pool = state.get_db().pool();

    let admin = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;
    seed_employee(pool, "EMP001", None, Some(1000.0)).await;
    let run = payroll::create_run(pool, "2026-01-01", "2026-01-31", admin.id)
        .await
        .expect("create run");

    let tasks = state.start_background_tasks().await;
    assert!(state.jobs().enqueue(Job::ProcessPayroll { run_id: run.id }));

    let completed = wait_for_completion(state, run.id).await;
    assert_eq!(completed.status, PayrollStatus::Completed);
    assert_eq!(completed.total_amount, 900.0);

    tasks.shutdown().await;
}

async fn wait_for_completion(state: &ServerState, run_id: i64) -> shared::models::PayrollRun {
    let pool = state.get_db().pool();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let run = payroll::find_run_by_id(pool, run_id)
            .await
            .expect("reload")
            .expect("exists");
        if run.status != PayrollStatus::Pending && run.status != PayrollStatus::Processing {
            return run;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("payroll run {run_id} still {:?} after 5s", run.status);
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[tokio::test]
async fn compensation_changes_append_to_history() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let admin = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;
    let worker = seed_employee(pool, "EMP001", None, Some(1000.0)).await;

    let entry = employee::insert_compensation(
        pool,
        worker.id,
        "2026-02-01",
        worker.salary,
        1200.0,
        Some("annual raise"),
        admin.id,
    )
    .await
    .expect("record change");
    employee::update_salary(pool, worker.id, 1200.0)
        .await
        .expect("apply salary");

    assert_eq!(entry.old_salary, Some(1000.0));
    assert_eq!(entry.new_salary, 1200.0);

    let reloaded = employee::find_by_id(pool, worker.id)
        .await
        .expect("reload")
        .expect("exists");
    assert_eq!(reloaded.salary, Some(1200.0));

    let history = employee::list_compensation_history(pool, worker.id, 0, 10)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_reason.as_deref(), Some("annual raise"));
    assert_eq!(history[0].changed_by, Some(admin.id));
}
