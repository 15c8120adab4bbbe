//! Reports API Handlers
//!
//! 管理层分析报表, 全部只读。聚合在 SQL 里完成, 这里只做比率
//! 计算和取整。

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};

use shared::models::{
    AbsenteeismReport, ExportQuery, HeadcountReport, LeaveUtilizationReport, ReportPeriodQuery,
    TurnoverReport, YearQuery,
};
use shared::util::round2;

use crate::AppError;
use crate::auth::{Action, CurrentUser, Target, authorize};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::AppResult;
use crate::utils::time::{
    current_year, day_end_millis, day_start_millis, format_date, inclusive_days, parse_date,
};

/// GET /api/reports/headcount - 编制报表
pub async fn headcount(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<HeadcountReport>> {
    authorize(&user, Action::ReportsView, Target::none())?;
    let pool = state.get_db().pool();

    let total_employees = repository::reports::count_employees(pool).await?;
    let active_employees = repository::reports::count_active_employees(pool).await?;
    let inactive_employees = repository::reports::count_inactive_employees(pool).await?;

    let by_department: HashMap<String, i64> = repository::reports::count_by_department(pool)
        .await?
        .into_iter()
        .collect();
    let by_position: HashMap<String, i64> = repository::reports::count_by_position(pool)
        .await?
        .into_iter()
        .collect();

    Ok(Json(HeadcountReport {
        total_employees,
        active_employees,
        inactive_employees,
        by_department,
        by_position,
    }))
}

/// GET /api/reports/turnover - 离职率
///
/// 期初取 period_start 前入职且仍在职的人数, 期末取当前在职
/// 人数, 离职数按档案最后变更时间落在期间内统计。
pub async fn turnover(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ReportPeriodQuery>,
) -> AppResult<Json<TurnoverReport>> {
    authorize(&user, Action::ReportsView, Target::none())?;
    let pool = state.get_db().pool();
    let tz = state.config.timezone;

    let start = parse_date(&query.period_start)?;
    let end = parse_date(&query.period_end)?;

    let beginning_headcount =
        repository::reports::count_active_hired_before(pool, &format_date(start)).await?;
    let ending_headcount = repository::reports::count_active_employees(pool).await?;
    let terminations = repository::reports::count_terminated_between(
        pool,
        day_start_millis(start, tz),
        day_end_millis(end, tz),
    )
    .await?;

    let avg_headcount = if beginning_headcount + ending_headcount > 0 {
        (beginning_headcount + ending_headcount) as f64 / 2.0
    } else {
        1.0
    };
    let turnover_rate = round2(terminations as f64 / avg_headcount * 100.0);

    Ok(Json(TurnoverReport {
        period_start: format_date(start),
        period_end: format_date(end),
        beginning_headcount,
        ending_headcount,
        terminations,
        turnover_rate,
    }))
}

/// GET /api/reports/leave-utilization - 假期使用率
pub async fn leave_utilization(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<LeaveUtilizationReport>> {
    authorize(&user, Action::ReportsView, Target::none())?;
    let pool = state.get_db().pool();

    let year = query
        .year
        .unwrap_or_else(|| current_year(state.config.timezone));

    let total_employees = repository::reports::count_active_employees(pool).await?;
    let total_leave_days = repository::reports::sum_approved_leave_days(pool, year).await?;
    let average_per_employee = if total_employees > 0 {
        round2(total_leave_days / total_employees as f64)
    } else {
        0.0
    };

    let by_leave_type: HashMap<String, f64> =
        repository::reports::sum_approved_leave_days_by_type(pool, year)
            .await?
            .into_iter()
            .map(|(id, days)| (format!("leave_type_{id}"), days))
            .collect();

    Ok(Json(LeaveUtilizationReport {
        total_employees,
        total_leave_days,
        average_per_employee,
        by_leave_type,
    }))
}

/// GET /api/reports/absenteeism - 缺勤率
///
/// 工作日数是 span * 5 / 7 的粗略估计, 不看周末的实际分布。
pub async fn absenteeism(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ReportPeriodQuery>,
) -> AppResult<Json<AbsenteeismReport>> {
    authorize(&user, Action::ReportsView, Target::none())?;
    let pool = state.get_db().pool();

    let start = parse_date(&query.period_start)?;
    let end = parse_date(&query.period_end)?;
    let total_days = inclusive_days(start, end);
    let total_workdays = total_days * 5 / 7;

    let total_absences =
        repository::reports::count_absences(pool, &format_date(start), &format_date(end)).await?;
    let active_employees = repository::reports::count_active_employees(pool).await?;

    let possible_workdays = total_workdays * active_employees;
    let absenteeism_rate = if possible_workdays > 0 {
        round2(total_absences as f64 / possible_workdays as f64 * 100.0)
    } else {
        0.0
    };

    Ok(Json(AbsenteeismReport {
        period_start: format_date(start),
        period_end: format_date(end),
        total_workdays,
        total_absences,
        absenteeism_rate,
    }))
}

/// GET /api/reports/export/{report_type} - CSV 导出
///
/// 目前只有 employees 有真实数据, 其余类型返回占位行。
pub async fn export(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(report_type): Path<String>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    authorize(&user, Action::ReportsView, Target::none())?;

    if !matches!(
        report_type.as_str(),
        "headcount" | "employees" | "leave" | "attendance"
    ) {
        return Err(AppError::validation("Invalid report type"));
    }
    let format = query.format.as_deref().unwrap_or("csv");
    if format != "csv" {
        return Err(AppError::validation(format!(
            "Unsupported export format: {format}"
        )));
    }

    let body = match report_type.as_str() {
        "employees" => {
            let rows = repository::reports::list_employee_export_rows(state.get_db().pool()).await?;
            let mut out = csv_line(&[
                "Employee Number",
                "Name",
                "Email",
                "Department",
                "Position",
                "Status",
            ]);
            for row in rows {
                let name = format!("{} {}", row.first_name, row.last_name);
                out.push_str(&csv_line(&[
                    &row.employee_number,
                    &name,
                    &row.email,
                    &row.department,
                    &row.position,
                    &row.status,
                ]));
            }
            out
        }
        _ => {
            let mut out = csv_line(&["message"]);
            out.push_str(&csv_line(&["Report type not implemented yet"]));
            out
        }
    };

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{report_type}_report.csv\""),
        ),
    ];
    Ok((headers, body))
}

/// RFC 4180 quoting, applied only when a field needs it
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line(fields: &[&str]) -> String {
    let cells: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
    let mut line = cells.join(",");
    line.push_str("\r\n");
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_line(&["a", "b,c"]), "a,\"b,c\"\r\n");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(15.0 / 95.0 * 100.0), 15.79);
        assert_eq!(round2(0.0), 0.0);
    }
}
