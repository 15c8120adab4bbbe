//! Employee profiles and compensation history

use serde::{Deserialize, Serialize};

use super::{Department, Position};

/// Employment lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentStatus {
    Active,
    Inactive,
    Terminated,
    OnLeave,
}

impl Default for EmploymentStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Employee profile row
///
/// `manager_id` is self-referential and must stay acyclic. Dates are
/// `YYYY-MM-DD` strings so they sort chronologically as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub hire_date: String,
    pub employment_status: EmploymentStatus,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub salary: Option<f64>,
    pub currency: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Employee with resolved department and position
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub department: Option<Department>,
    pub position: Option<Position>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Onboarding payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub hire_date: String,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub salary: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Profile update payload, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub department_id: Option<i64>,
    pub position_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub salary: Option<f64>,
}

/// List filters for the employee directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeListQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
    pub department_id: Option<i64>,
    pub status: Option<EmploymentStatus>,
}

/// Salary change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationUpdate {
    pub new_salary: f64,
    pub effective_date: String,
    pub change_reason: Option<String>,
}

/// Append-only salary change ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CompensationHistory {
    pub id: i64,
    pub employee_id: i64,
    pub effective_date: String,
    pub old_salary: Option<f64>,
    pub new_salary: f64,
    pub change_reason: Option<String>,
    pub changed_by: Option<i64>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employment_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&EmploymentStatus::OnLeave).expect("serialize"),
            "\"ON_LEAVE\""
        );
        let status: EmploymentStatus = serde_json::from_str("\"TERMINATED\"").expect("deserialize");
        assert_eq!(status, EmploymentStatus::Terminated);
    }

    #[test]
    fn test_create_defaults_currency() {
        let payload: EmployeeCreate = serde_json::from_str(
            r#"{
                "employee_number": "EMP-001",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "hire_date": "2024-01-15"
            }"#,
        )
        .expect("deserialize");
        assert_eq!(payload.currency, "USD");
        assert!(payload.salary.is_none());
    }

    #[test]
    fn test_update_all_fields_optional() {
        let payload: EmployeeUpdate = serde_json::from_str("{}").expect("deserialize");
        assert!(payload.first_name.is_none());
        assert!(payload.employment_status.is_none());
    }
}
