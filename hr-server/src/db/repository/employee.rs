//! Employee Repository
//!
//! 员工档案数据访问层。`manager_id` 构成汇报链, 更新时必须保持无环。

use super::{RepoError, RepoResult};
use shared::models::{
    CompensationHistory, Employee, EmployeeCreate, EmployeeDetail, EmployeeUpdate,
    EmploymentStatus,
};
use sqlx::SqlitePool;

const EMPLOYEE_SELECT: &str = "SELECT id, employee_number, first_name, last_name, email, phone, date_of_birth, gender, address, hire_date, employment_status, department_id, position_id, manager_id, salary, currency, created_at, updated_at FROM employees";

/// How deep a reporting chain may go before we assume corruption.
const MAX_CHAIN_DEPTH: usize = 100;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("{} WHERE id = ?", EMPLOYEE_SELECT);
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_employee_number(
    pool: &SqlitePool,
    employee_number: &str,
) -> RepoResult<Option<Employee>> {
    let sql = format!("{} WHERE employee_number = ?", EMPLOYEE_SELECT);
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(employee_number)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("{} WHERE email = ?", EMPLOYEE_SELECT);
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Directory listing with optional department / status / manager filters.
pub async fn list(
    pool: &SqlitePool,
    department_id: Option<i64>,
    status: Option<EmploymentStatus>,
    manager_id: Option<i64>,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<Employee>> {
    let sql = format!(
        "{} WHERE (?1 IS NULL OR department_id = ?1) AND (?2 IS NULL OR employment_status = ?2) AND (?3 IS NULL OR manager_id = ?3) ORDER BY created_at DESC LIMIT ?4 OFFSET ?5",
        EMPLOYEE_SELECT
    );
    let rows = sqlx::query_as::<_, Employee>(&sql)
        .bind(department_id)
        .bind(status)
        .bind(manager_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Everyone a payroll run pays: ACTIVE and with a salary on file.
pub async fn list_active_paid(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!(
        "{} WHERE employment_status = 'ACTIVE' AND salary IS NOT NULL ORDER BY id",
        EMPLOYEE_SELECT
    );
    let rows = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Profile with department and position resolved.
pub async fn find_detail(pool: &SqlitePool, id: i64) -> RepoResult<Option<EmployeeDetail>> {
    let Some(employee) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let department = match employee.department_id {
        Some(dept_id) => super::department::find_by_id(pool, dept_id).await?,
        None => None,
    };
    let position = match employee.position_id {
        Some(pos_id) => super::position::find_by_id(pool, pos_id).await?,
        None => None,
    };
    Ok(Some(EmployeeDetail {
        employee,
        department,
        position,
    }))
}

pub async fn create(pool: &SqlitePool, data: &EmployeeCreate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO employees (id, employee_number, first_name, last_name, email, phone, date_of_birth, gender, address, hire_date, employment_status, department_id, position_id, manager_id, salary, currency, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 'ACTIVE', ?11, ?12, ?13, ?14, ?15, ?16, ?16)",
    )
    .bind(id)
    .bind(&data.employee_number)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.date_of_birth)
    .bind(&data.gender)
    .bind(&data.address)
    .bind(&data.hire_date)
    .bind(data.department_id)
    .bind(data.position_id)
    .bind(data.manager_id)
    .bind(data.salary)
    .bind(&data.currency)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Partial update. Absent fields keep their current value.
pub async fn update(pool: &SqlitePool, id: i64, data: &EmployeeUpdate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employees SET first_name = COALESCE(?1, first_name), last_name = COALESCE(?2, last_name), email = COALESCE(?3, email), phone = COALESCE(?4, phone), date_of_birth = COALESCE(?5, date_of_birth), gender = COALESCE(?6, gender), address = COALESCE(?7, address), employment_status = COALESCE(?8, employment_status), department_id = COALESCE(?9, department_id), position_id = COALESCE(?10, position_id), manager_id = COALESCE(?11, manager_id), salary = COALESCE(?12, salary), updated_at = ?13 WHERE id = ?14",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.date_of_birth)
    .bind(&data.gender)
    .bind(&data.address)
    .bind(data.employment_status)
    .bind(data.department_id)
    .bind(data.position_id)
    .bind(data.manager_id)
    .bind(data.salary)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload employee".into()))
}

pub async fn update_salary(pool: &SqlitePool, id: i64, salary: f64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE employees SET salary = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(salary)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(())
}

/// Walks the reporting chain upwards from `new_manager_id` and reports
/// whether assigning it to `employee_id` would close a cycle.
pub async fn manager_would_cycle(
    pool: &SqlitePool,
    employee_id: i64,
    new_manager_id: i64,
) -> RepoResult<bool> {
    if employee_id == new_manager_id {
        return Ok(true);
    }
    let mut cursor = Some(new_manager_id);
    let mut hops = 0usize;
    while let Some(current) = cursor {
        if current == employee_id {
            return Ok(true);
        }
        hops += 1;
        if hops > MAX_CHAIN_DEPTH {
            return Err(RepoError::Database(
                "Reporting chain exceeds maximum depth".into(),
            ));
        }
        let next: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT manager_id FROM employees WHERE id = ?")
                .bind(current)
                .fetch_optional(pool)
                .await?;
        cursor = match next {
            Some((manager_id,)) => manager_id,
            None => None,
        };
    }
    Ok(false)
}

pub async fn insert_compensation(
    pool: &SqlitePool,
    employee_id: i64,
    effective_date: &str,
    old_salary: Option<f64>,
    new_salary: f64,
    change_reason: Option<&str>,
    changed_by: i64,
) -> RepoResult<CompensationHistory> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO compensation_history (id, employee_id, effective_date, old_salary, new_salary, change_reason, changed_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(effective_date)
    .bind(old_salary)
    .bind(new_salary)
    .bind(change_reason)
    .bind(changed_by)
    .bind(now)
    .execute(pool)
    .await?;
    let row = sqlx::query_as::<_, CompensationHistory>(
        "SELECT id, employee_id, effective_date, old_salary, new_salary, change_reason, changed_by, created_at FROM compensation_history WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to record compensation change".into()))
}

pub async fn list_compensation_history(
    pool: &SqlitePool,
    employee_id: i64,
    skip: i64,
    limit: i64,
) -> RepoResult<Vec<CompensationHistory>> {
    let rows = sqlx::query_as::<_, CompensationHistory>(
        "SELECT id, employee_id, effective_date, old_salary, new_salary, change_reason, changed_by, created_at FROM compensation_history WHERE employee_id = ? ORDER BY effective_date DESC, created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(employee_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
