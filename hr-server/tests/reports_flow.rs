//! Aggregation queries feeding the management reports.

mod common;

use common::{seed_employee, seed_leave_type, seed_user};
use hr_server::db::DbService;
use hr_server::db::repository::{department, employee, leave, position, reports};
use shared::models::{
    DepartmentCreate, EmployeeUpdate, EmploymentStatus, LeaveRequestStatus, PositionCreate,
    UserRole,
};
use shared::util::now_millis;

#[tokio::test]
async fn headcount_groups_by_department_and_position() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();

    let engineering = department::create(
        pool,
        &DepartmentCreate {
            name: "Engineering".into(),
            code: Some("ENG".into()),
            description: None,
            location: None,
            head_id: None,
        },
    )
    .await
    .expect("department");
    let developer = position::create(
        pool,
        &PositionCreate {
            title: "Developer".into(),
            code: None,
            description: None,
            level: None,
        },
    )
    .await
    .expect("position");

    let in_dept = seed_employee(pool, "EMP001", None, None).await;
    employee::update(
        pool,
        in_dept.id,
        &EmployeeUpdate {
            department_id: Some(engineering.id),
            position_id: Some(developer.id),
            ..Default::default()
        },
    )
    .await
    .expect("assign");

    seed_employee(pool, "EMP002", None, None).await;
    let gone = seed_employee(pool, "EMP003", None, None).await;
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

    assert_eq!(reports::count_employees(pool).await.expect("total"), 3);
    assert_eq!(reports::count_active_employees(pool).await.expect("active"), 2);
    assert_eq!(
        reports::count_inactive_employees(pool).await.expect("inactive"),
        1
    );

    let by_department = reports::count_by_department(pool).await.expect("by dept");
    assert_eq!(by_department, vec![("Engineering".to_string(), 1)]);
    let by_position = reports::count_by_position(pool).await.expect("by position");
    assert_eq!(by_position, vec![("Developer".to_string(), 1)]);
}

#[tokio::test]
async fn turnover_inputs_use_hire_dates_and_termination_window() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();

    let veteran = seed_employee(pool, "EMP001", None, None).await;
    let newcomer = seed_employee(pool, "EMP002", None, None).await;
    sqlx::query("UPDATE employees SET hire_date = '2024-03-01' WHERE id = ?")
        .bind(veteran.id)
        .execute(pool)
        .await
        .expect("backdate");
    sqlx::query("UPDATE employees SET hire_date = '2026-02-01' WHERE id = ?")
        .bind(newcomer.id)
        .execute(pool)
        .await
        .expect("backdate");

    assert_eq!(
        reports::count_active_hired_before(pool, "2026-01-01")
            .await
            .expect("beginning headcount"),
        1
    );

    // Termination stamps updated_at; the window query keys off it.
    employee::update(
        pool,
        newcomer.id,
        &EmployeeUpdate {
            employment_status: Some(EmploymentStatus::Terminated),
            ..Default::default()
        },
    )
    .await
    .expect("terminate");

    let now = now_millis();
    let hour = 3_600_000;
    assert_eq!(
        reports::count_terminated_between(pool, now - hour, now + hour)
            .await
            .expect("in window"),
        1
    );
    assert_eq!(
        reports::count_terminated_between(pool, now - 3 * hour, now - 2 * hour)
            .await
            .expect("outside window"),
        0
    );
}

#[tokio::test]
async fn leave_utilization_sums_only_approved_requests_of_the_year() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let worker = seed_employee(pool, "EMP001", None, None).await;
    let approver = seed_user(pool, "hr@test.local", UserRole::HrAdmin, None).await;
    let annual = seed_leave_type(pool, "Annual Leave", 20).await;
    let sick = seed_leave_type(pool, "Sick Leave", 10).await;

    let mut approved_2026 = Vec::new();
    for (type_id, start, end, days) in [
        (annual.id, "2026-03-02", "2026-03-04", 3.0),
        (sick.id, "2026-06-10", "2026-06-11", 2.0),
        (annual.id, "2025-08-04", "2025-08-08", 5.0),
    ] {
        let request = leave::create_request(pool, worker.id, type_id, start, end, days, None)
            .await
            .expect("create");
        leave::decide_request(
            pool,
            request.id,
            LeaveRequestStatus::Approved,
            approver.id,
            None,
        )
        .await
        .expect("approve");
        if start.starts_with("2026") {
            approved_2026.push((type_id, days));
        }
    }
    // Still pending, must not count.
    leave::create_request(pool, worker.id, annual.id, "2026-09-01", "2026-09-05", 5.0, None)
        .await
        .expect("create");

    let total = reports::sum_approved_leave_days(pool, 2026)
        .await
        .expect("sum");
    assert_eq!(total, 5.0);

    let mut by_type = reports::sum_approved_leave_days_by_type(pool, 2026)
        .await
        .expect("by type");
    by_type.sort_by_key(|(id, _)| *id);
    approved_2026.sort_by_key(|(id, _)| *id);
    assert_eq!(by_type, approved_2026);
}

#[tokio::test]
async fn absence_count_is_bounded_by_the_window() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();
    let worker = seed_employee(pool, "EMP001", None, None).await;

    let now = now_millis();
    for (id, date, status) in [
        (1_i64, "2026-04-01", "ABSENT"),
        (2, "2026-04-02", "PRESENT"),
        (3, "2026-04-03", "ABSENT"),
        (4, "2026-05-01", "ABSENT"),
    ] {
        sqlx::query(
            "INSERT INTO attendance_records (id, employee_id, date, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        )
        .bind(id)
        .bind(worker.id)
        .bind(date)
        .bind(status)
        .bind(now)
        .execute(pool)
        .await
        .expect("insert record");
    }

    let absences = reports::count_absences(pool, "2026-04-01", "2026-04-30")
        .await
        .expect("count");
    assert_eq!(absences, 2);
}

#[tokio::test]
async fn export_rows_resolve_names_and_sort_by_number() {
    let db = DbService::new_in_memory().await.expect("db");
    let pool = db.pool();

    let engineering = department::create(
        pool,
        &DepartmentCreate {
            name: "Engineering".into(),
            code: None,
            description: None,
            location: None,
            head_id: None,
        },
    )
    .await
    .expect("department");

    let second = seed_employee(pool, "EMP002", None, None).await;
    employee::update(
        pool,
        second.id,
        &EmployeeUpdate {
            department_id: Some(engineering.id),
            ..Default::default()
        },
    )
    .await
    .expect("assign");
    seed_employee(pool, "EMP001", None, None).await;

    let rows = reports::list_employee_export_rows(pool).await.expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].employee_number, "EMP001");
    assert_eq!(rows[0].department, "");
    assert_eq!(rows[1].employee_number, "EMP002");
    assert_eq!(rows[1].department, "Engineering");
    assert_eq!(rows[1].status, "ACTIVE");
}
