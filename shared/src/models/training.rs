//! Training catalog and enrollments

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TrainingCourse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: Option<i64>,
    pub instructor: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingCourseCreate {
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: Option<i64>,
    pub instructor: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Enrollment, unique per (employee, course). Status is free-form
/// text, starting as "ENROLLED".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TrainingEnrollment {
    pub id: i64,
    pub employee_id: i64,
    pub course_id: i64,
    pub enrollment_date: String,
    pub completion_date: Option<String>,
    pub status: String,
    pub score: Option<f64>,
    pub created_at: i64,
}

/// Enrollment payload; `enrollment_date` defaults to today when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentCreate {
    pub employee_id: i64,
    pub course_id: i64,
    pub enrollment_date: Option<String>,
}
