//! Leave ledger and request lifecycle against a real schema.

mod common;

use common::{seed_employee, seed_leave_type, seed_user};
use hr_server::db::DbService;
use hr_server::db::repository::leave;
use shared::models::{LeaveRequestStatus, UserRole};

#[tokio::test]
async fn balance_ledger_keeps_available_in_sync() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;
    let annual = seed_leave_type(pool, "Annual Leave", 20).await;

    let balance = leave::upsert_balance(pool, employee.id, annual.id, 2026, 20.0)
        .await
        .expect("grant");
    assert_eq!(balance.total_days, 20.0);
    assert_eq!(balance.used_days, 0.0);
    assert_eq!(balance.available_days, 20.0);

    assert!(
        leave::debit_balance(pool, employee.id, annual.id, 2026, 3.0)
            .await
            .expect("debit")
    );
    let balance = leave::find_balance(pool, employee.id, annual.id, 2026)
        .await
        .expect("reload")
        .expect("exists");
    assert_eq!(balance.used_days, 3.0);
    assert_eq!(balance.available_days, 17.0);

    // A re-grant adjusts the entitlement but keeps days already taken.
    let balance = leave::upsert_balance(pool, employee.id, annual.id, 2026, 25.0)
        .await
        .expect("re-grant");
    assert_eq!(balance.total_days, 25.0);
    assert_eq!(balance.used_days, 3.0);
    assert_eq!(balance.available_days, 22.0);
}

#[tokio::test]
async fn debit_without_ledger_row_touches_nothing() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;
    let unpaid = seed_leave_type(pool, "Unpaid Leave", 0).await;

    // No entitlement row: the debit reports false and callers treat the
    // type as uncapped.
    let debited = leave::debit_balance(pool, employee.id, unpaid.id, 2026, 5.0)
        .await
        .expect("debit");
    assert!(!debited);
}

#[tokio::test]
async fn approving_a_request_is_a_one_shot_transition() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;
    let approver = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;
    let annual = seed_leave_type(pool, "Annual Leave", 20).await;
    leave::upsert_balance(pool, employee.id, annual.id, 2026, 20.0)
        .await
        .expect("grant");

    let request = leave::create_request(
        pool,
        employee.id,
        annual.id,
        "2026-03-02",
        "2026-03-04",
        3.0,
        Some("family visit"),
    )
    .await
    .expect("create request");
    assert_eq!(request.status, LeaveRequestStatus::Pending);
    assert_eq!(request.total_days, 3.0);

    let decided = leave::decide_request(
        pool,
        request.id,
        LeaveRequestStatus::Approved,
        approver.id,
        Some("enjoy"),
    )
    .await
    .expect("decide");
    assert!(decided);
    assert!(
        leave::debit_balance(pool, employee.id, annual.id, 2026, request.total_days)
            .await
            .expect("debit")
    );

    let request = leave::find_request_by_id(pool, request.id)
        .await
        .expect("reload")
        .expect("exists");
    assert_eq!(request.status, LeaveRequestStatus::Approved);
    assert_eq!(request.approved_by, Some(approver.id));
    assert_eq!(request.approval_comment.as_deref(), Some("enjoy"));
    assert!(request.approved_at.is_some());

    // A second decision or a cancellation finds no PENDING row to move.
    let redecided = leave::decide_request(
        pool,
        request.id,
        LeaveRequestStatus::Rejected,
        approver.id,
        None,
    )
    .await
    .expect("redecide");
    assert!(!redecided);
    assert!(!leave::cancel_request(pool, request.id).await.expect("cancel"));

    let balance = leave::find_balance(pool, employee.id, annual.id, 2026)
        .await
        .expect("reload balance")
        .expect("exists");
    assert_eq!(balance.available_days, 17.0);
}

#[tokio::test]
async fn cancelling_a_pending_request_blocks_later_decisions() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;
    let approver = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;
    let annual = seed_leave_type(pool, "Annual Leave", 20).await;

    let request = leave::create_request(
        pool,
        employee.id,
        annual.id,
        "2026-05-11",
        "2026-05-11",
        1.0,
        None,
    )
    .await
    .expect("create request");

    assert!(leave::cancel_request(pool, request.id).await.expect("cancel"));
    let request = leave::find_request_by_id(pool, request.id)
        .await
        .expect("reload")
        .expect("exists");
    assert_eq!(request.status, LeaveRequestStatus::Cancelled);

    let decided = leave::decide_request(
        pool,
        request.id,
        LeaveRequestStatus::Approved,
        approver.id,
        None,
    )
    .await
    .expect("decide");
    assert!(!decided);
}

#[tokio::test]
async fn team_view_only_shows_direct_reports() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let manager = seed_employee(pool, "MGR001", None, None).await;
    let report = seed_employee(pool, "EMP001", Some(manager.id), None).await;
    let outsider = seed_employee(pool, "EMP002", None, None).await;
    let annual = seed_leave_type(pool, "Annual Leave", 20).await;

    for employee_id in [report.id, outsider.id] {
        leave::create_request(
            pool,
            employee_id,
            annual.id,
            "2026-07-01",
            "2026-07-03",
            3.0,
            None,
        )
        .await
        .expect("create request");
    }

    let team = leave::list_team_requests(pool, Some(manager.id), None, 0, 100)
        .await
        .expect("team view");
    assert_eq!(team.len(), 1);
    assert_eq!(team[0].employee_id, report.id);

    // The company-wide view (HR) sees both.
    let all = leave::list_team_requests(pool, None, None, 0, 100)
        .await
        .expect("hr view");
    assert_eq!(all.len(), 2);

    let pending = leave::list_requests_by_employee(
        pool,
        report.id,
        Some(LeaveRequestStatus::Pending),
        0,
        100,
    )
    .await
    .expect("filtered list");
    assert_eq!(pending.len(), 1);
    let approved = leave::list_requests_by_employee(
        pool,
        report.id,
        Some(LeaveRequestStatus::Approved),
        0,
        100,
    )
    .await
    .expect("filtered list");
    assert!(approved.is_empty());
}
