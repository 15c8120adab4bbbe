//! Leave types, balances and requests

use serde::{Deserialize, Serialize};

/// Leave request lifecycle. PENDING is the only state that accepts
/// transitions; APPROVED, REJECTED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveRequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl Default for LeaveRequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl LeaveRequestStatus {
    /// Wire/storage form, e.g. for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveType {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    /// Annual cap; 0 means uncapped
    pub max_days_per_year: i64,
    pub is_paid: bool,
    pub requires_approval: bool,
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypeCreate {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub max_days_per_year: i64,
    #[serde(default = "default_true")]
    pub is_paid: bool,
    #[serde(default = "default_true")]
    pub requires_approval: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Per-employee, per-type, per-year day ledger.
/// `available_days` is kept equal to `total_days - used_days`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveBalance {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub year: i64,
    pub total_days: f64,
    pub used_days: f64,
    pub available_days: f64,
    pub updated_at: i64,
}

/// Balance with its leave type resolved
#[derive(Debug, Clone, Serialize)]
pub struct LeaveBalanceDetail {
    #[serde(flatten)]
    pub balance: LeaveBalance,
    pub leave_type: Option<LeaveType>,
}

/// Admin grant: creates or replaces the (employee, type, year) entitlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBalanceGrant {
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub year: i64,
    pub total_days: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub start_date: String,
    pub end_date: String,
    /// Inclusive day count of [start_date, end_date]
    pub total_days: f64,
    pub reason: Option<String>,
    pub status: LeaveRequestStatus,
    pub approved_by: Option<i64>,
    pub approval_comment: Option<String>,
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Submission payload; the requester is always the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestCreate {
    pub leave_type_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
}

/// Approval decision verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestAction {
    pub action: LeaveAction,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&LeaveRequestStatus::Cancelled).expect("serialize"),
            "\"CANCELLED\""
        );
    }

    #[test]
    fn test_action_accepts_only_known_verbs() {
        let action: LeaveRequestAction =
            serde_json::from_str(r#"{"action": "Approve", "comment": "ok"}"#).expect("deserialize");
        assert_eq!(action.action, LeaveAction::Approve);

        let bad = serde_json::from_str::<LeaveRequestAction>(r#"{"action": "Escalate"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_type_create_defaults() {
        let payload: LeaveTypeCreate =
            serde_json::from_str(r#"{"name": "Annual Leave"}"#).expect("deserialize");
        assert_eq!(payload.max_days_per_year, 0);
        assert!(payload.is_paid);
        assert!(payload.requires_approval);
        assert!(payload.is_active);
    }
}
