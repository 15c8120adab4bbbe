//! Payroll API Handlers
//!
//! 工资批次、工资条和调薪台账。批次金额由后台 worker 计算,
//! 这里只负责建批次和读结果。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use shared::ErrorCode;
use shared::models::{
    CompensationHistory, CompensationUpdate, PayrollRun, PayrollRunCreate, Payslip,
};

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::services::Job;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};

/// Page size when the client does not pass `limit`
const DEFAULT_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    skip: i64,
    limit: Option<i64>,
}

/// POST /api/payroll/runs - 建立工资批次 (HR)
///
/// 批次区间不允许与任何既有批次重叠, 包括失败的批次。
pub async fn create_run(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PayrollRunCreate>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::PayrollRunManage, Target::none())?;
    let pool = state.get_db().pool();

    let start = parse_date(&payload.period_start)?;
    let end = parse_date(&payload.period_end)?;
    if end <= start {
        return Err(AppError::new(ErrorCode::InvalidPayrollPeriod));
    }

    let overlap =
        repository::payroll::find_overlapping_run(pool, &payload.period_start, &payload.period_end)
            .await?;
    if overlap.is_some() {
        return Err(AppError::new(ErrorCode::PayrollPeriodOverlap));
    }

    let run =
        repository::payroll::create_run(pool, &payload.period_start, &payload.period_end, user.id)
            .await?;

    // Best effort: if the queue is full the run stays PENDING and a
    // later worker sweep picks it up.
    state.jobs().enqueue(Job::ProcessPayroll { run_id: run.id });

    Ok((StatusCode::CREATED, Json(run)))
}

/// GET /api/payroll/runs - 批次列表 (HR)
pub async fn list_runs(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<PayrollRun>>> {
    authorize(&user, Action::PayrollRunManage, Target::none())?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let runs = repository::payroll::list_runs(state.get_db().pool(), query.skip, limit).await?;
    Ok(Json(runs))
}

/// GET /api/payroll/runs/{id} - 单个批次 (HR)
pub async fn get_run(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<PayrollRun>> {
    authorize(&user, Action::PayrollRunManage, Target::none())?;

    let run = repository::payroll::find_run_by_id(state.get_db().pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PayrollRunNotFound))?;
    Ok(Json(run))
}

/// GET /api/payroll/payslips/{employee_id} - 员工工资条 (本人或 HR)
pub async fn list_payslips(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<Payslip>>> {
    authorize(&user, Action::PayslipView, Target::employee(employee_id))?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let slips =
        repository::payroll::list_payslips(state.get_db().pool(), employee_id, query.skip, limit)
            .await?;
    Ok(Json(slips))
}

/// GET /api/payroll/payslips/{employee_id}/{payslip_id} - 下载工资条 PDF
pub async fn download_payslip(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((employee_id, payslip_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::PayslipDownload, Target::employee(employee_id))?;

    let payslip = repository::payroll::find_payslip(state.get_db().pool(), payslip_id, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PayslipNotFound))?;

    let Some(file_path) = payslip.file_path.as_deref() else {
        return Err(AppError::new(ErrorCode::PayslipFileMissing));
    };

    let bytes = tokio::fs::read(file_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::new(ErrorCode::PayslipFileMissing)
        } else {
            AppError::internal(format!("Failed to read payslip file: {e}"))
        }
    })?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"payslip_{}.pdf\"", payslip.id),
        ),
    ];
    Ok((headers, bytes))
}

/// PUT /api/payroll/compensation/{employee_id} - 调薪 (HR)
///
/// 先落台账再改员工工资, 返回新增的台账行。
pub async fn update_compensation(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Json(payload): Json<CompensationUpdate>,
) -> AppResult<Json<CompensationHistory>> {
    authorize(&user, Action::CompensationManage, Target::none())?;
    let pool = state.get_db().pool();

    let employee = repository::employee::find_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    parse_date(&payload.effective_date)?;
    validate_optional_text(&payload.change_reason, "change_reason", MAX_NOTE_LEN)?;

    let entry = repository::employee::insert_compensation(
        pool,
        employee_id,
        &payload.effective_date,
        employee.salary,
        payload.new_salary,
        payload.change_reason.as_deref(),
        user.id,
    )
    .await?;
    repository::employee::update_salary(pool, employee_id, payload.new_salary).await?;

    Ok(Json(entry))
}

/// GET /api/payroll/compensation/history/{employee_id} - 调薪记录 (HR)
pub async fn compensation_history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(employee_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<CompensationHistory>>> {
    authorize(&user, Action::CompensationManage, Target::none())?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    let rows = repository::employee::list_compensation_history(
        state.get_db().pool(),
        employee_id,
        query.skip,
        limit,
    )
    .await?;
    Ok(Json(rows))
}
