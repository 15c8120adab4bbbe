//! Shifts and daily attendance records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        Self::Present
    }
}

/// Work shift, times as `HH:MM` strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Clock-in capture point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub long: f64,
}

/// One attendance row per employee per day. At most one open record
/// (clock_in set, clock_out null) per employee at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    pub id: i64,
    pub employee_id: i64,
    pub shift_id: Option<i64>,
    pub date: String,
    pub clock_in: Option<i64>,
    pub clock_out: Option<i64>,
    pub status: AttendanceStatus,
    pub hours_worked: f64,
    #[cfg_attr(feature = "db", sqlx(json(nullable)))]
    pub geo_location: Option<GeoLocation>,
    pub notes: Option<String>,
    pub is_reviewed: bool,
    pub reviewed_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceClockIn {
    pub employee_id: i64,
    pub geo_location: Option<GeoLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceClockOut {
    pub employee_id: i64,
}

/// Correction payload; `proposed_time` is a unix-millis timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceAdjustment {
    pub adjustment_reason: String,
    pub proposed_time: i64,
}

/// Record history filters, defaulting to the last 30 days
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).expect("serialize"),
            "\"HALF_DAY\""
        );
    }

    #[test]
    fn test_clock_in_location_optional() {
        let payload: AttendanceClockIn =
            serde_json::from_str(r#"{"employee_id": 7}"#).expect("deserialize");
        assert!(payload.geo_location.is_none());

        let payload: AttendanceClockIn = serde_json::from_str(
            r#"{"employee_id": 7, "geo_location": {"lat": 51.5, "long": -0.12}}"#,
        )
        .expect("deserialize");
        let loc = payload.geo_location.expect("location");
        assert_eq!(loc, GeoLocation { lat: 51.5, long: -0.12 });
    }
}
