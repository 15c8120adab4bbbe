//! Shared fixtures for integration tests.

#![allow(dead_code)]

use hr_server::db::repository;
use hr_server::{Config, CurrentUser, ServerState};
use shared::models::{Employee, EmployeeCreate, LeaveType, LeaveTypeCreate, User, UserRole};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A fully initialized server state backed by a throwaway database.
/// The temp dir is dropped with the context, removing the files.
pub struct TestServer {
    pub state: ServerState,
    _dir: TempDir,
}

pub async fn test_server() -> TestServer {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut config = Config::default();
    config.database_path = dir.path().join("test.db").display().to_string();
    config.upload_dir = dir.path().join("uploads").display().to_string();
    // Point external callbacks at a closed local port so delivery
    // attempts fail immediately instead of waiting on DNS.
    config.payroll_service_url = "http://127.0.0.1:1/api".into();
    config.calendar_service_url = "http://127.0.0.1:1/api".into();
    config.admin_email = None;
    config.admin_password = None;
    let state = ServerState::initialize(&config).await;
    TestServer { state, _dir: dir }
}

pub async fn seed_employee(
    pool: &SqlitePool,
    number: &str,
    manager_id: Option<i64>,
    salary: Option<f64>,
) -> Employee {
    let data = EmployeeCreate {
        employee_number: number.to_string(),
        first_name: "Ada".to_string(),
        last_name: number.to_string(),
        email: format!("{}@test.local", number.to_lowercase()),
        phone: None,
        date_of_birth: None,
        gender: None,
        address: None,
        hire_date: "2023-01-15".to_string(),
        department_id: None,
        position_id: None,
        manager_id,
        salary,
        currency: "USD".to_string(),
    };
    repository::employee::create(pool, &data)
        .await
        .expect("seed employee")
}

/// The stored hash is never verified in these tests, so a placeholder
/// string keeps them from paying the argon2 cost per fixture.
pub async fn seed_user(
    pool: &SqlitePool,
    email: &str,
    role: UserRole,
    employee_id: Option<i64>,
) -> User {
    repository::user::create(pool, email, "unverified-hash", role, employee_id)
        .await
        .expect("seed user")
}

pub async fn seed_leave_type(pool: &SqlitePool, name: &str, max_days: i64) -> LeaveType {
    let data = LeaveTypeCreate {
        name: name.to_string(),
        code: None,
        description: None,
        max_days_per_year: max_days,
        is_paid: true,
        requires_approval: true,
        is_active: true,
    };
    repository::leave::create_type(pool, &data)
        .await
        .expect("seed leave type")
}

pub fn account(id: i64, role: UserRole, employee_id: Option<i64>) -> CurrentUser {
    CurrentUser {
        id,
        email: format!("user{id}@test.local"),
        role,
        employee_id,
    }
}
