//! External Notification Service
//!
//! 对外部工资与日历服务的 HTTP 回调。全部尽力而为: 失败只记日志,
//! 绝不向上传播。

use std::time::Duration;

use serde_json::json;

use crate::core::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct NotifierService {
    client: reqwest::Client,
    payroll_service_url: String,
    calendar_service_url: String,
    api_key: String,
}

impl NotifierService {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            payroll_service_url: config.payroll_service_url.clone(),
            calendar_service_url: config.calendar_service_url.clone(),
            api_key: config.webhook_api_key.clone(),
        }
    }

    /// Tells the external payroll provider how a run ended.
    /// `total_amount` only accompanies a successful run.
    pub async fn notify_payroll_status(
        &self,
        run_id: i64,
        status: &str,
        total_amount: Option<f64>,
    ) {
        let mut payload = json!({
            "run_id": run_id,
            "status": status,
        });
        if let Some(total) = total_amount {
            payload["total_amount"] = json!(total);
        }

        let url = format!("{}/notify", self.payroll_service_url);
        match self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(run_id, status, "Payroll service notified");
            }
            Ok(resp) => {
                tracing::warn!(
                    run_id,
                    status = %resp.status(),
                    "Payroll notification returned non-success status"
                );
            }
            Err(e) => {
                tracing::warn!(run_id, error = %e, "Failed to notify payroll service");
            }
        }
    }

    /// Pushes a decided leave request to the external calendar.
    pub async fn sync_calendar(
        &self,
        employee_id: i64,
        leave_request_id: i64,
        status: &str,
        start_date: &str,
        end_date: &str,
    ) {
        let payload = json!({
            "employee_id": employee_id,
            "leave_request_id": leave_request_id,
            "status": status,
            "date_range": {
                "start": start_date,
                "end": end_date,
            },
        });

        let url = format!("{}/sync", self.calendar_service_url);
        match self
            .client
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(leave_request_id, employee_id, "Calendar sync delivered");
            }
            Ok(resp) => {
                tracing::warn!(
                    leave_request_id,
                    status = %resp.status(),
                    "Calendar sync returned non-success status"
                );
            }
            Err(e) => {
                tracing::warn!(leave_request_id, error = %e, "Failed to sync calendar");
            }
        }
    }
}
