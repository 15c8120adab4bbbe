//! Declarative authorization table
//!
//! Every guarded operation is an [`Action`]. [`policy`] maps each action to
//! the roles allowed on any row plus the row-level escapes (own row, direct
//! report), and [`authorize`] is the single evaluator. Handlers never
//! re-derive role checks inline; they load the target row, build a
//! [`Target`] and call [`authorize`].

use shared::models::UserRole;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::security_log;

use UserRole::{Executive, HrAdmin, Manager};

/// Guarded operations, one variant per HTTP surface that needs a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EmployeeList,
    EmployeeCreate,
    EmployeeView,
    EmployeeUpdate,
    DocumentUpload,
    DocumentDownload,
    DepartmentCreate,
    PositionCreate,
    LeaveTypeCreate,
    LeaveBalanceView,
    LeaveBalanceGrant,
    LeaveTeamRequests,
    LeaveRequestDecide,
    LeaveRequestCancel,
    AttendanceRecordsView,
    AttendanceReviewQueue,
    AttendanceReview,
    AttendanceAdjustDirect,
    PayrollRunManage,
    PayslipView,
    PayslipDownload,
    CompensationManage,
    ReviewCreate,
    ReviewFeedback,
    ManagerReviewsList,
    CourseCreate,
    TrainingEnroll,
    EnrollmentsView,
    ReportsView,
}

/// Who may perform an action
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    /// Roles allowed regardless of which row is targeted
    pub any_row: &'static [UserRole],
    /// The employee the row belongs to may act
    pub own_row: bool,
    /// The direct manager of the row's employee may act
    pub direct_report: bool,
}

/// Row-level facts about the target of an action
#[derive(Debug, Clone, Copy, Default)]
pub struct Target {
    /// Employee the row belongs to
    pub employee_id: Option<i64>,
    /// That employee's manager
    pub manager_id: Option<i64>,
}

impl Target {
    /// Role-only actions carry no row facts
    pub fn none() -> Self {
        Self::default()
    }

    /// Row owned by an employee, manager unknown or irrelevant
    pub fn employee(employee_id: i64) -> Self {
        Self {
            employee_id: Some(employee_id),
            manager_id: None,
        }
    }

    /// Row owned by an employee whose manager is known
    pub fn with_manager(employee_id: i64, manager_id: Option<i64>) -> Self {
        Self {
            employee_id: Some(employee_id),
            manager_id,
        }
    }
}

const HR_ONLY: Policy = Policy {
    any_row: &[HrAdmin],
    own_row: false,
    direct_report: false,
};

/// The authorization table
pub fn policy(action: Action) -> Policy {
    use Action::*;
    match action {
        EmployeeList | LeaveTeamRequests | AttendanceReviewQueue | ManagerReviewsList => Policy {
            any_row: &[HrAdmin, Manager],
            own_row: false,
            direct_report: false,
        },
        EmployeeView | LeaveBalanceView | AttendanceRecordsView => Policy {
            any_row: &[HrAdmin, Executive],
            own_row: true,
            direct_report: true,
        },
        EmployeeUpdate | DocumentUpload | DocumentDownload | LeaveRequestCancel | PayslipView
        | PayslipDownload | TrainingEnroll | EnrollmentsView => Policy {
            any_row: &[HrAdmin],
            own_row: true,
            direct_report: false,
        },
        LeaveRequestDecide | AttendanceReview | AttendanceAdjustDirect => Policy {
            any_row: &[HrAdmin],
            own_row: false,
            direct_report: true,
        },
        ReviewFeedback => Policy {
            any_row: &[],
            own_row: true,
            direct_report: true,
        },
        ReportsView => Policy {
            any_row: &[HrAdmin, Executive],
            own_row: false,
            direct_report: false,
        },
        EmployeeCreate | DepartmentCreate | PositionCreate | LeaveTypeCreate
        | LeaveBalanceGrant | PayrollRunManage | CompensationManage | ReviewCreate
        | CourseCreate => HR_ONLY,
    }
}

/// Client-facing message when an action is denied
fn deny_message(action: Action) -> &'static str {
    use Action::*;
    match action {
        EmployeeView => "Not authorized to view this employee",
        EmployeeUpdate => "Not authorized to update this employee",
        DocumentUpload => "Not authorized to upload documents for this employee",
        DocumentDownload => "Not authorized to access this document",
        LeaveBalanceView => "Not authorized to view these balances",
        LeaveRequestDecide => "Not authorized to action this request",
        LeaveRequestCancel => "Not authorized to cancel this request",
        AttendanceRecordsView => "Not authorized to view these records",
        AttendanceReview => "Not authorized to review this record",
        AttendanceAdjustDirect => "Not authorized to adjust this record",
        PayslipView => "Not authorized to view these payslips",
        PayslipDownload => "Not authorized to download this payslip",
        ReviewFeedback => "Not authorized to provide feedback for this review",
        ManagerReviewsList => "Not authorized to view these reviews",
        TrainingEnroll => "Not authorized to enroll this employee",
        EnrollmentsView => "Not authorized to view these enrollments",
        _ => "Not enough permissions",
    }
}

/// Evaluate the table for one (user, action, target) triple
pub fn authorize(user: &CurrentUser, action: Action, target: Target) -> Result<(), AppError> {
    let rule = policy(action);

    if rule.any_row.contains(&user.role) {
        return Ok(());
    }

    if rule.own_row
        && let (Some(me), Some(owner)) = (user.employee_id, target.employee_id)
        && me == owner
    {
        return Ok(());
    }

    if rule.direct_report
        && user.role == Manager
        && let (Some(me), Some(manager)) = (user.employee_id, target.manager_id)
        && me == manager
    {
        return Ok(());
    }

    security_log!(
        "WARN",
        "authorization_denied",
        user_id = user.id,
        role = user.role.as_str(),
        action = format!("{:?}", action)
    );
    Err(AppError::forbidden(deny_message(action)))
}

/// Role-only gate, used before the target row is even loaded
///
/// Matches the evaluation order of the HTTP surface: a caller with the
/// wrong role gets 403 even when the target row does not exist.
pub fn require_role(user: &CurrentUser, roles: &[UserRole]) -> Result<(), AppError> {
    if roles.contains(&user.role) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "role_denied",
        user_id = user.id,
        role = user.role.as_str()
    );
    Err(AppError::forbidden("Not enough permissions"))
}
