//! Clock-in/out lifecycle and the correction review queue.

mod common;

use common::{seed_employee, seed_user};
use hr_server::db::DbService;
use hr_server::db::repository::{RepoError, attendance};
use hr_server::utils::time::hours_between;
use shared::models::{GeoLocation, UserRole};

const NINE_AM: i64 = 1_775_034_000_000;
const HALF_PAST_FIVE: i64 = NINE_AM + (8 * 3600 + 1800) * 1000;

#[tokio::test]
async fn clock_cycle_computes_hours_worked() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;

    let record = attendance::create_clock_in(pool, employee.id, "2026-04-01", NINE_AM, None)
        .await
        .expect("clock in");
    assert_eq!(record.clock_in, Some(NINE_AM));
    assert!(record.clock_out.is_none());

    // The open record is what blocks a second clock-in for the day.
    let open = attendance::find_open_record(pool, employee.id, "2026-04-01")
        .await
        .expect("lookup")
        .expect("open record");
    assert_eq!(open.id, record.id);

    let hours = hours_between(NINE_AM, HALF_PAST_FIVE);
    assert_eq!(hours, 8.5);
    let closed = attendance::close_record(pool, record.id, HALF_PAST_FIVE, hours)
        .await
        .expect("clock out");
    assert_eq!(closed.clock_out, Some(HALF_PAST_FIVE));
    assert_eq!(closed.hours_worked, 8.5);

    assert!(
        attendance::find_open_record(pool, employee.id, "2026-04-01")
            .await
            .expect("lookup")
            .is_none()
    );

    // The day is closed, a second clock-out has nothing to close.
    let err = attendance::close_record(pool, record.id, HALF_PAST_FIVE, hours)
        .await
        .expect_err("already closed");
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn clock_in_location_survives_storage() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;

    let location = GeoLocation {
        lat: 25.033,
        long: 121.565,
    };
    let record = attendance::create_clock_in(
        pool,
        employee.id,
        "2026-04-01",
        NINE_AM,
        Some(&location),
    )
    .await
    .expect("clock in");
    assert_eq!(record.geo_location, Some(location));
}

#[tokio::test]
async fn applied_adjustment_corrects_and_reviews_in_one_step() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;
    let reviewer = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;

    let record = attendance::create_clock_in(pool, employee.id, "2026-04-01", NINE_AM, None)
        .await
        .expect("clock in");
    attendance::close_record(pool, record.id, HALF_PAST_FIVE, 8.5)
        .await
        .expect("clock out");

    // Badge reader was late: the real start was 08:00.
    let actual_start = NINE_AM - 3600 * 1000;
    let hours = hours_between(actual_start, HALF_PAST_FIVE);
    let adjusted = attendance::apply_adjustment(
        pool,
        record.id,
        actual_start,
        Some(hours),
        "badge reader outage",
        reviewer.id,
    )
    .await
    .expect("adjust");
    assert_eq!(adjusted.clock_in, Some(actual_start));
    assert_eq!(adjusted.hours_worked, 9.5);
    assert!(adjusted.is_reviewed);
    assert_eq!(adjusted.reviewed_by, Some(reviewer.id));
    assert_eq!(adjusted.notes.as_deref(), Some("badge reader outage"));
}

#[tokio::test]
async fn proposed_adjustment_waits_for_review() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;
    let reviewer = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;

    let record = attendance::create_clock_in(pool, employee.id, "2026-04-01", NINE_AM, None)
        .await
        .expect("clock in");

    let proposed = attendance::propose_adjustment(pool, record.id, "forgot to badge in at 08:00")
        .await
        .expect("propose");
    assert!(!proposed.is_reviewed);
    assert_eq!(proposed.clock_in, Some(NINE_AM));
    assert_eq!(
        proposed.notes.as_deref(),
        Some("forgot to badge in at 08:00")
    );

    let reviewed = attendance::mark_reviewed(pool, record.id, reviewer.id)
        .await
        .expect("review");
    assert!(reviewed.is_reviewed);
    assert_eq!(reviewed.reviewed_by, Some(reviewer.id));
}

#[tokio::test]
async fn review_queue_is_scoped_to_direct_reports() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let manager = seed_employee(pool, "MGR001", None, None).await;
    let report = seed_employee(pool, "EMP001", Some(manager.id), None).await;
    let outsider = seed_employee(pool, "EMP002", None, None).await;

    for employee_id in [report.id, outsider.id] {
        attendance::create_clock_in(pool, employee_id, "2026-04-01", NINE_AM, None)
            .await
            .expect("clock in");
    }

    let team_queue = attendance::list_unreviewed(pool, Some(manager.id), 0, 100)
        .await
        .expect("team queue");
    assert_eq!(team_queue.len(), 1);
    assert_eq!(team_queue[0].employee_id, report.id);

    let hr_queue = attendance::list_unreviewed(pool, None, 0, 100)
        .await
        .expect("hr queue");
    assert_eq!(hr_queue.len(), 2);
}

#[tokio::test]
async fn record_history_is_bounded_by_the_date_window() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let employee = seed_employee(pool, "EMP001", None, None).await;

    for (date, offset) in [("2026-04-01", 0), ("2026-04-02", 1), ("2026-04-08", 7)] {
        let clock_in = NINE_AM + offset * 86_400_000;
        let record = attendance::create_clock_in(pool, employee.id, date, clock_in, None)
            .await
            .expect("clock in");
        attendance::close_record(pool, record.id, clock_in + 8 * 3600 * 1000, 8.0)
            .await
            .expect("clock out");
    }

    let week = attendance::list_records(pool, employee.id, "2026-04-01", "2026-04-07", 0, 100)
        .await
        .expect("history");
    assert_eq!(week.len(), 2);
    // Newest first.
    assert_eq!(week[0].date, "2026-04-02");
    assert_eq!(week[1].date, "2026-04-01");
}
