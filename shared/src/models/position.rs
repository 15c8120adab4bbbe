//! Position lookup dimension

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Position {
    pub id: i64,
    pub title: String,
    pub code: Option<String>,
    pub description: Option<String>,
    /// Seniority band, free-form (e.g. "L3", "Senior")
    pub level: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionCreate {
    pub title: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
}
