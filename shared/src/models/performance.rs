//! Performance review cycles

use serde::{Deserialize, Serialize};

/// A review stays PENDING until feedback is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Completed,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PerformanceReview {
    pub id: i64,
    pub employee_id: i64,
    pub reviewer_id: i64,
    pub review_period_start: String,
    pub review_period_end: String,
    pub overall_rating: Option<f64>,
    pub comments: Option<String>,
    pub status: ReviewStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReviewCreate {
    pub employee_id: i64,
    pub reviewer_id: i64,
    pub review_period_start: String,
    pub review_period_end: String,
}

/// Feedback submission; rating is bounded to 0..=5 at the handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub overall_rating: Option<f64>,
    pub comments: Option<String>,
}
