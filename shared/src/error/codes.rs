//! Unified error codes for the HR platform
//!
//! This module defines all error codes used across the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Employee and organization errors
//! - 4xxx: Leave errors
//! - 5xxx: Attendance errors
//! - 6xxx: Payroll errors (65xx: file handling)
//! - 7xxx: Performance and training errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account is locked
    AccountLocked = 1006,
    /// Account is disabled
    AccountDisabled = 1007,
    /// API key is invalid (webhook callers)
    InvalidApiKey = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Employee & Organization ====================
    /// Employee not found
    EmployeeNotFound = 3001,
    /// Employee number already exists
    EmployeeNumberExists = 3002,
    /// Employee email already exists
    EmployeeEmailExists = 3003,
    /// Department not found
    DepartmentNotFound = 3004,
    /// Position not found
    PositionNotFound = 3005,
    /// User account not found
    UserNotFound = 3006,
    /// Employee document not found
    DocumentNotFound = 3007,
    /// Stored file missing on disk
    StoredFileMissing = 3008,
    /// Department name already exists
    DepartmentNameExists = 3009,
    /// Position title already exists
    PositionTitleExists = 3010,
    /// Manager assignment would create a cycle
    ManagerCycle = 3011,

    // ==================== 4xxx: Leave ====================
    /// Leave request not found
    LeaveRequestNotFound = 4001,
    /// Leave request is not pending
    LeaveRequestNotPending = 4002,
    /// Insufficient leave balance
    InsufficientLeaveBalance = 4003,
    /// Invalid date range
    InvalidDateRange = 4004,
    /// Leave type not found
    LeaveTypeNotFound = 4005,
    /// Leave type name already exists
    LeaveTypeNameExists = 4006,
    /// Leave balance not found
    LeaveBalanceNotFound = 4007,

    // ==================== 5xxx: Attendance ====================
    /// Attendance record not found
    AttendanceNotFound = 5001,
    /// Already clocked in for the day
    AlreadyClockedIn = 5002,
    /// No active clock-in to close
    NoActiveClockIn = 5003,
    /// Shift not found
    ShiftNotFound = 5004,

    // ==================== 6xxx: Payroll ====================
    /// Payroll run not found
    PayrollRunNotFound = 6001,
    /// Payroll period overlaps an existing run
    PayrollPeriodOverlap = 6002,
    /// Payroll period is invalid
    InvalidPayrollPeriod = 6003,
    /// Payslip not found
    PayslipNotFound = 6004,
    /// Payslip file not available
    PayslipFileMissing = 6005,
    /// Payroll run is not pending
    PayrollRunNotPending = 6006,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Empty file provided
    EmptyFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// No filename provided
    NoFilename = 6505,
    /// File storage failed
    FileStorageFailed = 6506,

    // ==================== 7xxx: Performance & Training ====================
    /// Performance review not found
    ReviewNotFound = 7001,
    /// Review employee or reviewer not found
    ReviewParticipantNotFound = 7002,
    /// Training course not found
    CourseNotFound = 7101,
    /// Training enrollment not found
    EnrollmentNotFound = 7102,
    /// Already enrolled in course
    AlreadyEnrolled = 7103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Incorrect email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountLocked => "Account is locked",
            ErrorCode::AccountDisabled => "User account is inactive",
            ErrorCode::InvalidApiKey => "Invalid API key",

            // Permission
            ErrorCode::PermissionDenied => "Not enough permissions",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Employee & Organization
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeNumberExists => "Employee number already exists",
            ErrorCode::EmployeeEmailExists => "Email already exists",
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::PositionNotFound => "Position not found",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::StoredFileMissing => "File not found on server",
            ErrorCode::DepartmentNameExists => "Department name already exists",
            ErrorCode::PositionTitleExists => "Position title already exists",
            ErrorCode::ManagerCycle => "Manager assignment would create a reporting cycle",

            // Leave
            ErrorCode::LeaveRequestNotFound => "Leave request not found",
            ErrorCode::LeaveRequestNotPending => "Leave request is not pending",
            ErrorCode::InsufficientLeaveBalance => "Insufficient leave balance",
            ErrorCode::InvalidDateRange => "Invalid date range",
            ErrorCode::LeaveTypeNotFound => "Leave type not found",
            ErrorCode::LeaveTypeNameExists => "Leave type name already exists",
            ErrorCode::LeaveBalanceNotFound => "Leave balance not found",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AlreadyClockedIn => "Already clocked in today. Please clock out first.",
            ErrorCode::NoActiveClockIn => "No clock-in record found for today",
            ErrorCode::ShiftNotFound => "Shift not found",

            // Payroll
            ErrorCode::PayrollRunNotFound => "Payroll run not found",
            ErrorCode::PayrollPeriodOverlap => "Payroll run overlaps with existing run",
            ErrorCode::InvalidPayrollPeriod => "End date must be after start date",
            ErrorCode::PayslipNotFound => "Payslip not found",
            ErrorCode::PayslipFileMissing => "Payslip file not available",
            ErrorCode::PayrollRunNotPending => "Payroll run is not pending",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "File type not allowed",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::FileStorageFailed => "File storage failed",

            // Performance & Training
            ErrorCode::ReviewNotFound => "Performance review not found",
            ErrorCode::ReviewParticipantNotFound => "Employee or reviewer not found",
            ErrorCode::CourseNotFound => "Training course not found",
            ErrorCode::EnrollmentNotFound => "Training enrollment not found",
            ErrorCode::AlreadyEnrolled => "Already enrolled in this course",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountLocked),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::InvalidApiKey),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Employee & Organization
            3001 => Ok(ErrorCode::EmployeeNotFound),
            3002 => Ok(ErrorCode::EmployeeNumberExists),
            3003 => Ok(ErrorCode::EmployeeEmailExists),
            3004 => Ok(ErrorCode::DepartmentNotFound),
            3005 => Ok(ErrorCode::PositionNotFound),
            3006 => Ok(ErrorCode::UserNotFound),
            3007 => Ok(ErrorCode::DocumentNotFound),
            3008 => Ok(ErrorCode::StoredFileMissing),
            3009 => Ok(ErrorCode::DepartmentNameExists),
            3010 => Ok(ErrorCode::PositionTitleExists),
            3011 => Ok(ErrorCode::ManagerCycle),

            // Leave
            4001 => Ok(ErrorCode::LeaveRequestNotFound),
            4002 => Ok(ErrorCode::LeaveRequestNotPending),
            4003 => Ok(ErrorCode::InsufficientLeaveBalance),
            4004 => Ok(ErrorCode::InvalidDateRange),
            4005 => Ok(ErrorCode::LeaveTypeNotFound),
            4006 => Ok(ErrorCode::LeaveTypeNameExists),
            4007 => Ok(ErrorCode::LeaveBalanceNotFound),

            // Attendance
            5001 => Ok(ErrorCode::AttendanceNotFound),
            5002 => Ok(ErrorCode::AlreadyClockedIn),
            5003 => Ok(ErrorCode::NoActiveClockIn),
            5004 => Ok(ErrorCode::ShiftNotFound),

            // Payroll
            6001 => Ok(ErrorCode::PayrollRunNotFound),
            6002 => Ok(ErrorCode::PayrollPeriodOverlap),
            6003 => Ok(ErrorCode::InvalidPayrollPeriod),
            6004 => Ok(ErrorCode::PayslipNotFound),
            6005 => Ok(ErrorCode::PayslipFileMissing),
            6006 => Ok(ErrorCode::PayrollRunNotPending),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::EmptyFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::NoFilename),
            6506 => Ok(ErrorCode::FileStorageFailed),

            // Performance & Training
            7001 => Ok(ErrorCode::ReviewNotFound),
            7002 => Ok(ErrorCode::ReviewParticipantNotFound),
            7101 => Ok(ErrorCode::CourseNotFound),
            7102 => Ok(ErrorCode::EnrollmentNotFound),
            7103 => Ok(ErrorCode::AlreadyEnrolled),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);
        assert_eq!(ErrorCode::InvalidRequest.code(), 5);

        // Auth
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::TokenExpired.code(), 1003);
        assert_eq!(ErrorCode::TokenInvalid.code(), 1004);
        assert_eq!(ErrorCode::AccountDisabled.code(), 1007);
        assert_eq!(ErrorCode::InvalidApiKey.code(), 1008);

        // Permission
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::RoleRequired.code(), 2002);

        // Employee & Organization
        assert_eq!(ErrorCode::EmployeeNotFound.code(), 3001);
        assert_eq!(ErrorCode::EmployeeNumberExists.code(), 3002);
        assert_eq!(ErrorCode::EmployeeEmailExists.code(), 3003);
        assert_eq!(ErrorCode::DepartmentNotFound.code(), 3004);
        assert_eq!(ErrorCode::PositionNotFound.code(), 3005);
        assert_eq!(ErrorCode::DocumentNotFound.code(), 3007);
        assert_eq!(ErrorCode::ManagerCycle.code(), 3011);

        // Leave
        assert_eq!(ErrorCode::LeaveRequestNotFound.code(), 4001);
        assert_eq!(ErrorCode::LeaveRequestNotPending.code(), 4002);
        assert_eq!(ErrorCode::InsufficientLeaveBalance.code(), 4003);
        assert_eq!(ErrorCode::InvalidDateRange.code(), 4004);
        assert_eq!(ErrorCode::LeaveTypeNotFound.code(), 4005);

        // Attendance
        assert_eq!(ErrorCode::AttendanceNotFound.code(), 5001);
        assert_eq!(ErrorCode::AlreadyClockedIn.code(), 5002);
        assert_eq!(ErrorCode::NoActiveClockIn.code(), 5003);
        assert_eq!(ErrorCode::ShiftNotFound.code(), 5004);

        // Payroll
        assert_eq!(ErrorCode::PayrollRunNotFound.code(), 6001);
        assert_eq!(ErrorCode::PayrollPeriodOverlap.code(), 6002);
        assert_eq!(ErrorCode::InvalidPayrollPeriod.code(), 6003);
        assert_eq!(ErrorCode::PayslipNotFound.code(), 6004);
        assert_eq!(ErrorCode::PayslipFileMissing.code(), 6005);

        // File Upload
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);
        assert_eq!(ErrorCode::UnsupportedFileFormat.code(), 6502);

        // Performance & Training
        assert_eq!(ErrorCode::ReviewNotFound.code(), 7001);
        assert_eq!(ErrorCode::CourseNotFound.code(), 7101);
        assert_eq!(ErrorCode::AlreadyEnrolled.code(), 7103);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
    }

    #[test]
    fn test_error_code_messages() {
        assert_eq!(
            ErrorCode::InvalidCredentials.message(),
            "Incorrect email or password"
        );
        assert_eq!(
            ErrorCode::AlreadyClockedIn.message(),
            "Already clocked in today. Please clock out first."
        );
        assert_eq!(
            ErrorCode::PayrollPeriodOverlap.message(),
            "Payroll run overlaps with existing run"
        );
        assert_eq!(
            ErrorCode::InvalidPayrollPeriod.message(),
            "End date must be after start date"
        );
        assert_eq!(
            ErrorCode::AlreadyEnrolled.message(),
            "Already enrolled in this course"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let code = ErrorCode::NotFound;
        let json = serde_json::to_string(&code).expect("serialize");
        assert_eq!(json, "3");

        let code = ErrorCode::LeaveRequestNotFound;
        let json = serde_json::to_string(&code).expect("serialize");
        assert_eq!(json, "4001");
    }

    #[test]
    fn test_deserialize_from_number() {
        let code: ErrorCode = serde_json::from_str("5002").expect("deserialize");
        assert_eq!(code, ErrorCode::AlreadyClockedIn);

        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip_conversion() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::EmployeeNotFound,
            ErrorCode::InsufficientLeaveBalance,
            ErrorCode::AlreadyClockedIn,
            ErrorCode::PayrollPeriodOverlap,
            ErrorCode::AlreadyEnrolled,
            ErrorCode::InternalError,
        ];

        for code in codes {
            let value: u16 = code.into();
            let back = ErrorCode::try_from(value).expect("roundtrip");
            assert_eq!(code, back);
        }
    }

    #[test]
    fn test_invalid_code_conversion() {
        let result = ErrorCode::try_from(60000);
        assert_eq!(result, Err(InvalidErrorCode(60000)));
    }

    #[test]
    fn test_display_is_numeric() {
        assert_eq!(ErrorCode::Success.to_string(), "0");
        assert_eq!(ErrorCode::EmployeeNotFound.to_string(), "3001");
    }
}
