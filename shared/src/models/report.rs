//! Analytics report payloads

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadcountReport {
    pub total_employees: i64,
    pub active_employees: i64,
    pub inactive_employees: i64,
    pub by_department: HashMap<String, i64>,
    pub by_position: HashMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnoverReport {
    pub period_start: String,
    pub period_end: String,
    pub beginning_headcount: i64,
    pub ending_headcount: i64,
    pub terminations: i64,
    /// Percentage, rounded to 2 decimal places
    pub turnover_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveUtilizationReport {
    pub total_employees: i64,
    pub total_leave_days: f64,
    pub average_per_employee: f64,
    /// Keyed as `leave_type_{id}`
    pub by_leave_type: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenteeismReport {
    pub period_start: String,
    pub period_end: String,
    pub total_workdays: i64,
    pub total_absences: i64,
    pub absenteeism_rate: f64,
}

/// Period bounds for turnover and absenteeism reports
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPeriodQuery {
    pub period_start: String,
    pub period_end: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}
