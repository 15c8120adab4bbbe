//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis 或 `YYYY-MM-DD` 字符串。

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 格式化日期 (YYYY-MM-DD)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 当前日期 (业务时区)
pub fn today_in(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 当前年份 (业务时区)
pub fn current_year(tz: Tz) -> i64 {
    today_in(tz).year() as i64
}

/// 闭区间天数 (起止同日 = 1)
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// 两个 Unix millis 之间的小时数，保留两位小数
pub fn hours_between(start_ms: i64, end_ms: i64) -> f64 {
    let secs = (end_ms - start_ms) as f64 / 1000.0;
    shared::util::round2(secs / 3600.0)
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap_or_default();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let d = parse_date("2025-03-14").unwrap();
        assert_eq!(format_date(d), "2025-03-14");
        assert!(parse_date("14/03/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn test_inclusive_days() {
        let start = parse_date("2025-01-01").unwrap();
        assert_eq!(inclusive_days(start, start), 1);

        let end = parse_date("2025-01-10").unwrap();
        assert_eq!(inclusive_days(start, end), 10);

        // Reversed range goes non-positive
        assert!(inclusive_days(end, start) <= 0);
    }

    #[test]
    fn test_hours_between() {
        // 09:00 -> 17:30 same day
        let start = 1_700_000_000_000i64;
        let end = start + (8 * 3600 + 30 * 60) * 1000;
        assert_eq!(hours_between(start, end), 8.5);
    }

    #[test]
    fn test_day_bounds() {
        let tz: Tz = "UTC".parse().unwrap();
        let d = parse_date("2025-06-15").unwrap();
        let start = day_start_millis(d, tz);
        let end = day_end_millis(d, tz);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }
}
