//! Attendance API Handlers
//!
//! 打卡、考勤记录查询与纠错复核。日期一律取业务时区的当天。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::ErrorCode;
use shared::models::{
    AttendanceAdjustment, AttendanceClockIn, AttendanceClockOut, AttendanceListQuery,
    AttendanceRecord, Shift, UserRole,
};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize, require_role};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::time::{format_date, hours_between, parse_date, today_in};
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};

/// Page size when the client does not pass `limit`
const DEFAULT_PAGE_SIZE: i64 = 100;

/// History window when the client passes no `start_date`
const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
}

/// GET /api/attendance/shifts - 在用班次 (任何已登录用户)
pub async fn list_shifts(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Shift>>> {
    let shifts = repository::attendance::list_active_shifts(state.get_db().pool()).await?;
    Ok(Json(shifts))
}

/// POST /api/attendance/clock-in - 上班打卡 (只能为本人)
///
/// One open record per employee per day; a closed record does not block
/// a second clock-in.
pub async fn clock_in(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AttendanceClockIn>,
) -> AppResult<Json<AttendanceRecord>> {
    let employee_id = user.require_employee_id()?;
    if payload.employee_id != employee_id {
        return Err(AppError::forbidden("Cannot clock in for another employee"));
    }

    let pool = state.get_db().pool();
    let today = format_date(today_in(state.config.timezone));
    if repository::attendance::find_open_record(pool, employee_id, &today)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::AlreadyClockedIn));
    }

    let record = repository::attendance::create_clock_in(
        pool,
        employee_id,
        &today,
        shared::util::now_millis(),
        payload.geo_location.as_ref(),
    )
    .await?;
    Ok(Json(record))
}

/// POST /api/attendance/clock-out - 下班打卡 (只能为本人)
pub async fn clock_out(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AttendanceClockOut>,
) -> AppResult<Json<AttendanceRecord>> {
    let employee_id = user.require_employee_id()?;
    if payload.employee_id != employee_id {
        return Err(AppError::forbidden("Cannot clock out for another employee"));
    }

    let pool = state.get_db().pool();
    let today = format_date(today_in(state.config.timezone));
    let record = repository::attendance::find_open_record(pool, employee_id, &today)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NoActiveClockIn))?;

    let now = shared::util::now_millis();
    let hours_worked = match record.clock_in {
        Some(clock_in) => hours_between(clock_in, now),
        None => record.hours_worked,
    };
    let record = repository::attendance::close_record(pool, record.id, now, hours_worked).await?;
    Ok(Json(record))
}

/// GET /api/attendance/records/{employee_id} - 考勤历史
///
/// Range defaults to the last 30 days.
pub async fn list_records(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<AttendanceListQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let pool = state.get_db().pool();
    let target = match repository::employee::find_by_id(pool, employee_id).await? {
        Some(employee) => Target::with_manager(employee_id, employee.manager_id),
        None => Target::employee(employee_id),
    };
    authorize(&user, Action::AttendanceRecordsView, target)?;

    let today = today_in(state.config.timezone);
    let start_date = match &query.start_date {
        Some(s) => parse_date(s)?,
        None => today - chrono::Duration::days(DEFAULT_RANGE_DAYS),
    };
    let end_date = match &query.end_date {
        Some(s) => parse_date(s)?,
        None => today,
    };

    let records = repository::attendance::list_records(
        pool,
        employee_id,
        &format_date(start_date),
        &format_date(end_date),
        query.skip,
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(records))
}

/// GET /api/attendance/records/review - 待复核记录 (经理/HR)
pub async fn list_review_queue(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    authorize(&user, Action::AttendanceReviewQueue, Target::none())?;

    let manager_scope = if user.role == UserRole::Manager {
        match user.employee_id {
            Some(id) => Some(id),
            None => return Ok(Json(Vec::new())),
        }
    } else {
        None
    };

    let records = repository::attendance::list_unreviewed(
        state.get_db().pool(),
        manager_scope,
        query.skip,
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(records))
}

/// POST /api/attendance/records/{id}/adjustment - 纠错
///
/// A manager of the record's employee (or HR) applies the correction
/// immediately; the record's owner files a proposal into `notes` for the
/// review queue; anyone else is refused.
pub async fn request_adjustment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<AttendanceAdjustment>,
) -> AppResult<Json<AttendanceRecord>> {
    let pool = state.get_db().pool();
    let record = repository::attendance::find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AttendanceNotFound))?;

    validate_required_text(&payload.adjustment_reason, "adjustment_reason", MAX_NOTE_LEN)?;

    if matches!(user.role, UserRole::Manager | UserRole::HrAdmin) {
        let target = match repository::employee::find_by_id(pool, record.employee_id).await? {
            Some(employee) => Target::with_manager(record.employee_id, employee.manager_id),
            None => Target::employee(record.employee_id),
        };
        authorize(&user, Action::AttendanceAdjustDirect, target)?;

        let hours_worked = record
            .clock_out
            .map(|clock_out| hours_between(payload.proposed_time, clock_out));
        let updated = repository::attendance::apply_adjustment(
            pool,
            id,
            payload.proposed_time,
            hours_worked,
            &payload.adjustment_reason,
            user.id,
        )
        .await?;
        return Ok(Json(updated));
    }

    if user.employee_id == Some(record.employee_id) {
        let notes = format!(
            "Adjustment requested: {}. Proposed time: {}",
            payload.adjustment_reason, payload.proposed_time
        );
        let updated = repository::attendance::propose_adjustment(pool, id, &notes).await?;
        return Ok(Json(updated));
    }

    Err(AppError::forbidden("Not authorized to adjust this record"))
}

/// PUT /api/attendance/records/{id}/review - 标记已复核 (经理/HR)
pub async fn review_record(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AttendanceRecord>> {
    require_role(&user, &[UserRole::Manager, UserRole::HrAdmin])?;

    let pool = state.get_db().pool();
    let record = repository::attendance::find_record_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AttendanceNotFound))?;

    let target = match repository::employee::find_by_id(pool, record.employee_id).await? {
        Some(employee) => Target::with_manager(record.employee_id, employee.manager_id),
        None => Target::employee(record.employee_id),
    };
    authorize(&user, Action::AttendanceReview, target)?;

    let updated = repository::attendance::mark_reviewed(pool, id, user.id).await?;
    Ok(Json(updated))
}
