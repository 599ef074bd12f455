//! 日期工具函数
//!
//! 所有业务日期统一为 `YYYY-MM-DD` 文本，在 handler / 领域层解析为
//! [`NaiveDate`]；repository 层只接收文本或 Unix millis。

use chrono::NaiveDate;

use crate::utils::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 今天的日期 (UTC)
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 月份的首日和末日 (inclusive)
///
/// `month` 为 1–12；越界返回 ValidationError。
pub fn month_bounds(month: u32, year: i32) -> AppResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}/{}", month, year)))?;
    let next_month_start = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::validation(format!("Invalid month: {}/{}", month, year)))?;
    let end = next_month_start.pred_opt().unwrap_or(start);
    Ok((start, end))
}

/// 年末日期 (Dec 31)
pub fn year_end(year: i32) -> NaiveDate {
    // Dec 31 exists for every year chrono can represent
    NaiveDate::from_ymd_opt(year, 12, 31).expect("Dec 31 always exists")
}

/// 日期格式化为 YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let d = parse_date("2024-07-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("07/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_month_bounds_february_leap_year() {
        let (start, end) = month_bounds(2, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_month_bounds_december() {
        let (start, end) = month_bounds(12, 2024).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds_rejects_invalid_month() {
        assert!(month_bounds(0, 2024).is_err());
        assert!(month_bounds(13, 2024).is_err());
    }
}
