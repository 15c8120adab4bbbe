//! Inbound webhook payloads from external payroll and calendar systems

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollWebhookStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollStatusWebhook {
    pub run_id: i64,
    pub status: PayrollWebhookStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSyncStatus {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSyncWebhook {
    pub employee_id: i64,
    pub leave_request_id: i64,
    pub status: CalendarSyncStatus,
    pub date_range: DateRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payroll_status_lowercase() {
        let hook: PayrollStatusWebhook =
            serde_json::from_str(r#"{"run_id": 1, "status": "failure", "details": "bank rejected"}"#)
                .expect("deserialize");
        assert_eq!(hook.status, PayrollWebhookStatus::Failure);

        let bad = serde_json::from_str::<PayrollStatusWebhook>(r#"{"run_id": 1, "status": "done"}"#);
        assert!(bad.is_err());
    }
}
