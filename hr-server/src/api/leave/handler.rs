//! Leave API Handlers
//!
//! 假期类型、余额台账和请假申请的审批流。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use shared::ErrorCode;
use shared::models::{
    LeaveAction, LeaveBalance, LeaveBalanceDetail, LeaveBalanceGrant, LeaveRequest,
    LeaveRequestAction, LeaveRequestCreate, LeaveRequestStatus, LeaveType, LeaveTypeCreate,
    UserRole, YearQuery,
};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize, require_role};
use crate::core::ServerState;
use crate::db::repository;
use crate::services::Job;
use crate::utils::AppResult;
use crate::utils::time::{current_year, inclusive_days, parse_date};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

/// Page size when the client does not pass `limit`
const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct RequestListQuery {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
    status: Option<LeaveRequestStatus>,
}

/// GET /api/leave/types - 可用假期类型 (任何已登录用户)
pub async fn list_types(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<LeaveType>>> {
    let types = repository::leave::list_active_types(state.get_db().pool()).await?;
    Ok(Json(types))
}

/// POST /api/leave/types - 新建假期类型 (仅 HR)
pub async fn create_type(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveTypeCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::LeaveTypeCreate, Target::none())?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;

    let pool = state.get_db().pool();
    if repository::leave::find_type_by_name(pool, &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::LeaveTypeNameExists));
    }

    let leave_type = repository::leave::create_type(pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(leave_type)))
}

/// GET /api/leave/balances/{employee_id} - 某员工的假期余额
///
/// Year defaults to the current year in the business timezone.
pub async fn get_balances(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<Vec<LeaveBalanceDetail>>> {
    let pool = state.get_db().pool();
    let target = match repository::employee::find_by_id(pool, employee_id).await? {
        Some(employee) => Target::with_manager(employee_id, employee.manager_id),
        None => Target::employee(employee_id),
    };
    authorize(&user, Action::LeaveBalanceView, target)?;

    let year = query
        .year
        .unwrap_or_else(|| current_year(state.config.timezone));
    let balances = repository::leave::list_balances(pool, employee_id, year).await?;
    Ok(Json(balances))
}

/// PUT /api/leave/balances - 发放/调整年度额度 (仅 HR)
///
/// Upsert semantics: re-granting keeps `used_days` and recomputes
/// `available_days` from the new total.
pub async fn grant_balance(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveBalanceGrant>,
) -> AppResult<Json<LeaveBalance>> {
    authorize(&user, Action::LeaveBalanceGrant, Target::none())?;
    if payload.total_days < 0.0 {
        return Err(AppError::validation("total_days must be non-negative"));
    }

    let balance = repository::leave::upsert_balance(
        state.get_db().pool(),
        payload.employee_id,
        payload.leave_type_id,
        payload.year,
        payload.total_days,
    )
    .await?;
    Ok(Json(balance))
}

/// POST /api/leave/requests - 提交请假申请 (只能为本人)
pub async fn create_request(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveRequestCreate>,
) -> AppResult<impl IntoResponse> {
    let employee_id = user.require_employee_id()?;
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let pool = state.get_db().pool();
    let leave_type = repository::leave::find_type_by_id(pool, payload.leave_type_id).await?;
    if !leave_type.is_some_and(|t| t.is_active) {
        return Err(AppError::validation("Invalid leave type"));
    }

    let start = parse_date(&payload.start_date)?;
    let end = parse_date(&payload.end_date)?;
    let total_days = inclusive_days(start, end) as f64;
    if total_days <= 0.0 {
        return Err(AppError::new(ErrorCode::InvalidDateRange));
    }

    // A missing ledger row means the type is uncapped for this employee.
    let year = current_year(state.config.timezone);
    let balance =
        repository::leave::find_balance(pool, employee_id, payload.leave_type_id, year).await?;
    if let Some(balance) = balance
        && balance.available_days < total_days
    {
        return Err(AppError::with_message(
            ErrorCode::InsufficientLeaveBalance,
            format!(
                "Insufficient leave balance. Available: {} days",
                balance.available_days
            ),
        ));
    }

    let request = repository::leave::create_request(
        pool,
        employee_id,
        payload.leave_type_id,
        &payload.start_date,
        &payload.end_date,
        total_days,
        payload.reason.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/leave/requests - 本人的请假记录
pub async fn list_my_requests(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<RequestListQuery>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let employee_id = user.require_employee_id()?;
    let requests = repository::leave::list_requests_by_employee(
        state.get_db().pool(),
        employee_id,
        query.status,
        query.skip,
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(requests))
}

/// GET /api/leave/requests/team - 团队请假记录 (经理/HR)
///
/// `status` defaults to PENDING, the approval work queue.
pub async fn list_team_requests(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<RequestListQuery>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    authorize(&user, Action::LeaveTeamRequests, Target::none())?;

    let manager_scope = if user.role == UserRole::Manager {
        match user.employee_id {
            Some(id) => Some(id),
            None => return Ok(Json(Vec::new())),
        }
    } else {
        None
    };

    let status = query.status.unwrap_or(LeaveRequestStatus::Pending);
    let requests = repository::leave::list_team_requests(
        state.get_db().pool(),
        manager_scope,
        Some(status),
        query.skip,
        query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(requests))
}

/// PUT /api/leave/requests/{id}/action - 审批 (经理/HR)
///
/// Approve debits the current-year balance when a ledger row exists and
/// enqueues a calendar sync; reject only records the decision.
pub async fn action_request(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(action): Json<LeaveRequestAction>,
) -> AppResult<Json<LeaveRequest>> {
    require_role(&user, &[UserRole::Manager, UserRole::HrAdmin])?;

    let pool = state.get_db().pool();
    let request = repository::leave::find_request_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveRequestNotFound))?;

    if request.status != LeaveRequestStatus::Pending {
        return Err(not_pending(request.status));
    }

    let target = match repository::employee::find_by_id(pool, request.employee_id).await? {
        Some(employee) => Target::with_manager(request.employee_id, employee.manager_id),
        None => Target::employee(request.employee_id),
    };
    authorize(&user, Action::LeaveRequestDecide, target)?;

    let new_status = match action.action {
        LeaveAction::Approve => LeaveRequestStatus::Approved,
        LeaveAction::Reject => LeaveRequestStatus::Rejected,
    };

    // The PENDING guard in the update makes a concurrent double decision
    // lose here instead of overwriting the first one.
    let decided =
        repository::leave::decide_request(pool, id, new_status, user.id, action.comment.as_deref())
            .await?;
    if !decided {
        let status = repository::leave::find_request_by_id(pool, id)
            .await?
            .map(|r| r.status)
            .unwrap_or(request.status);
        return Err(not_pending(status));
    }

    if new_status == LeaveRequestStatus::Approved {
        let year = current_year(state.config.timezone);
        repository::leave::debit_balance(
            pool,
            request.employee_id,
            request.leave_type_id,
            year,
            request.total_days,
        )
        .await?;

        state.jobs().enqueue(Job::SyncCalendar {
            employee_id: request.employee_id,
            leave_request_id: request.id,
            status: "approved".to_string(),
            start_date: request.start_date.clone(),
            end_date: request.end_date.clone(),
        });
    }

    let updated = repository::leave::find_request_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveRequestNotFound))?;
    Ok(Json(updated))
}

/// POST /api/leave/requests/{id}/cancel - 撤回申请 (本人或 HR)
pub async fn cancel_request(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<LeaveRequest>> {
    let pool = state.get_db().pool();
    let request = repository::leave::find_request_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveRequestNotFound))?;

    authorize(
        &user,
        Action::LeaveRequestCancel,
        Target::employee(request.employee_id),
    )?;

    if !repository::leave::cancel_request(pool, id).await? {
        let status = repository::leave::find_request_by_id(pool, id)
            .await?
            .map(|r| r.status)
            .unwrap_or(request.status);
        return Err(AppError::with_message(
            ErrorCode::LeaveRequestNotPending,
            format!("Cannot cancel request with status: {}", status.as_str()),
        ));
    }

    let updated = repository::leave::find_request_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveRequestNotFound))?;
    Ok(Json(updated))
}

fn not_pending(status: LeaveRequestStatus) -> AppError {
    AppError::with_message(
        ErrorCode::LeaveRequestNotPending,
        format!("Cannot action request with status: {}", status.as_str()),
    )
}
