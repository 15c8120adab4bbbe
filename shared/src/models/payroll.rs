//! Payroll runs and payslips

use serde::{Deserialize, Serialize};

/// Run lifecycle: PENDING → PROCESSING → COMPLETED | FAILED.
/// FAILED is terminal; a failed period needs a fresh run after cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl Default for PayrollStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PayrollRun {
    pub id: i64,
    pub period_start: String,
    pub period_end: String,
    pub status: PayrollStatus,
    pub total_amount: f64,
    pub processed_by: Option<i64>,
    pub processed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRunCreate {
    pub period_start: String,
    pub period_end: String,
}

/// Amounts are computed once at run-processing time and never recomputed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payslip {
    pub id: i64,
    pub employee_id: i64,
    pub payroll_run_id: i64,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub tax: f64,
    pub net_salary: f64,
    pub currency: String,
    pub file_path: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&PayrollStatus::Processing).expect("serialize"),
            "\"PROCESSING\""
        );
        let status: PayrollStatus = serde_json::from_str("\"FAILED\"").expect("deserialize");
        assert_eq!(status, PayrollStatus::Failed);
    }
}
