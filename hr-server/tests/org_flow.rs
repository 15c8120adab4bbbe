//! Org-structure guards, enrollment uniqueness, and review closure.

mod common;

use common::{seed_employee, seed_leave_type};
use hr_server::db::DbService;
use hr_server::db::repository::{RepoError, employee, leave, performance, training};
use shared::models::{
    EmployeeCreate, LeaveTypeCreate, PerformanceReviewCreate, ReviewStatus, TrainingCourseCreate,
};

#[tokio::test]
async fn manager_chains_refuse_to_loop() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let director = seed_employee(pool, "EMP001", None, None).await;
    let manager = seed_employee(pool, "EMP002", Some(director.id), None).await;
    let report = seed_employee(pool, "EMP003", Some(manager.id), None).await;
    let outsider = seed_employee(pool, "EMP004", None, None).await;

    // Pointing the director at their own reporting chain closes a loop.
    assert!(
        employee::manager_would_cycle(pool, director.id, report.id)
            .await
            .expect("walk chain")
    );
    assert!(
        employee::manager_would_cycle(pool, director.id, manager.id)
            .await
            .expect("walk chain")
    );
    // Self-management is the one-hop version of the same loop.
    assert!(
        employee::manager_would_cycle(pool, director.id, director.id)
            .await
            .expect("walk chain")
    );
    assert!(
        !employee::manager_would_cycle(pool, director.id, outsider.id)
            .await
            .expect("walk chain")
    );
}

#[tokio::test]
async fn unique_identifiers_reject_duplicates() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();

    let data = EmployeeCreate {
        employee_number: "EMP001".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@test.local".into(),
        phone: None,
        date_of_birth: None,
        gender: None,
        address: None,
        hire_date: "2023-01-15".into(),
        department_id: None,
        position_id: None,
        manager_id: None,
        salary: None,
        currency: "USD".into(),
    };
    employee::create(pool, &data).await.expect("first insert");
    let err = employee::create(pool, &data).await.expect_err("duplicate");
    assert!(matches!(err, RepoError::Duplicate(_)));

    seed_leave_type(pool, "Annual Leave", 20).await;
    let err = leave::create_type(
        pool,
        &LeaveTypeCreate {
            name: "Annual Leave".into(),
            code: None,
            description: None,
            max_days_per_year: 15,
            is_paid: true,
            requires_approval: true,
            is_active: true,
        },
    )
    .await
    .expect_err("duplicate type");
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn enrollment_is_unique_per_employee_and_course() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let worker = seed_employee(pool, "EMP001", None, None).await;
    let course = training::create_course(
        pool,
        &TrainingCourseCreate {
            title: "Workplace Safety".into(),
            description: None,
            duration_hours: Some(4),
            instructor: Some("R. Feynman".into()),
            is_active: true,
        },
    )
    .await
    .expect("course");

    let enrollment = training::create_enrollment(pool, worker.id, course.id, "2026-02-10")
        .await
        .expect("enroll");
    assert_eq!(enrollment.status, "ENROLLED");

    let found = training::find_enrollment(pool, worker.id, course.id)
        .await
        .expect("lookup");
    assert!(found.is_some());

    let err = training::create_enrollment(pool, worker.id, course.id, "2026-02-11")
        .await
        .expect_err("double enroll");
    assert!(matches!(err, RepoError::Duplicate(_)));

    let listed = training::list_enrollments(pool, worker.id, 0, 10)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn feedback_closes_the_review_and_keeps_earlier_values() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let worker = seed_employee(pool, "EMP001", None, None).await;
    let reviewer = seed_employee(pool, "EMP002", None, None).await;

    let review = performance::create(
        pool,
        &PerformanceReviewCreate {
            employee_id: worker.id,
            reviewer_id: reviewer.id,
            review_period_start: "2026-01-01".into(),
            review_period_end: "2026-06-30".into(),
        },
    )
    .await
    .expect("create review");
    assert_eq!(review.status, ReviewStatus::Pending);

    let queue = performance::list_pending_by_reviewer(pool, reviewer.id, 0, 10)
        .await
        .expect("queue");
    assert_eq!(queue.len(), 1);

    let completed = performance::apply_feedback(pool, review.id, Some(4.5), Some("solid half"))
        .await
        .expect("feedback");
    assert_eq!(completed.status, ReviewStatus::Completed);
    assert_eq!(completed.overall_rating, Some(4.5));
    assert_eq!(completed.comments.as_deref(), Some("solid half"));

    // Re-submitting without fields leaves the stored feedback alone.
    let unchanged = performance::apply_feedback(pool, review.id, None, None)
        .await
        .expect("idempotent");
    assert_eq!(unchanged.overall_rating, Some(4.5));
    assert_eq!(unchanged.comments.as_deref(), Some("solid half"));

    let queue = performance::list_pending_by_reviewer(pool, reviewer.id, 0, 10)
        .await
        .expect("queue");
    assert!(queue.is_empty());
}
