//! Inbound Webhook Handlers

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use serde_json::{Value, json};

use shared::ErrorCode;
use shared::models::{CalendarSyncWebhook, PayrollStatus, PayrollStatusWebhook, PayrollWebhookStatus};

use crate::AppError;
use crate::core::ServerState;
use crate::db::repository;
use crate::security_log;
use crate::utils::AppResult;

/// 共享密钥校验。密钥错误或缺失一律 401, 不区分两种情况。
fn verify_key(state: &ServerState, headers: &HeaderMap) -> Result<(), AppError> {
    let presented = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if presented != state.config.webhook_api_key {
        security_log!("WARN", "webhook_key_rejected");
        return Err(AppError::new(ErrorCode::InvalidApiKey));
    }
    Ok(())
}

/// POST /api/webhooks/payroll-status - 外部工资系统回写批次状态
pub async fn payroll_status(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<PayrollStatusWebhook>,
) -> AppResult<Json<Value>> {
    verify_key(&state, &headers)?;
    let pool = state.get_db().pool();

    repository::payroll::find_run_by_id(pool, payload.run_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PayrollRunNotFound))?;

    let status = match payload.status {
        PayrollWebhookStatus::Success => PayrollStatus::Completed,
        PayrollWebhookStatus::Failure => PayrollStatus::Failed,
    };
    repository::payroll::set_run_status(pool, payload.run_id, status).await?;

    security_log!(
        "INFO",
        "webhook_payroll_status",
        run_id = payload.run_id,
        outcome = format!("{:?}", payload.status)
    );

    Ok(Json(json!({
        "message": "Payroll status updated successfully",
        "run_id": payload.run_id,
        "status": payload.status,
    })))
}

/// POST /api/webhooks/calendar-sync - 外部日历确认同步结果
///
/// 只做确认, 不回写请假单。员工号对不上按坏请求拒绝。
pub async fn calendar_sync(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<CalendarSyncWebhook>,
) -> AppResult<Json<Value>> {
    verify_key(&state, &headers)?;
    let pool = state.get_db().pool();

    let request = repository::leave::find_request_by_id(pool, payload.leave_request_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LeaveRequestNotFound))?;

    if request.employee_id != payload.employee_id {
        return Err(AppError::invalid_request("Employee ID mismatch"));
    }

    Ok(Json(json!({
        "message": "Calendar sync confirmed",
        "employee_id": payload.employee_id,
        "leave_request_id": payload.leave_request_id,
        "status": payload.status,
    })))
}

/// POST /api/webhooks/external-event - 通用事件入口, 只回显
pub async fn external_event(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(event): Json<Value>,
) -> AppResult<Json<Value>> {
    verify_key(&state, &headers)?;

    let event_type = event
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let message = format!("External event received: {event_type}");

    Ok(Json(json!({
        "message": message,
        "event_data": event,
    })))
}
