//! 工作日历
//!
//! 把公司的周工作掩码翻译成天数：某月有多少个工作日、一段闭区间覆盖
//! 多少个工作日。请假天数和工资单都用同一套掩码计数 —— 请假只按工作日
//! 扣减，所以两种口径共用一个函数。
//!
//! 配置缺失或查询失败都静默回退 Mon–Fri / 8h 默认值：日历不可用绝不能
//! 阻塞请假或工资操作。

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

use shared::models::WorkSchedule;

use crate::db::repository::work_schedule;

/// 日薪固定月除数：日薪 = (年薪 / 12) / 30
///
/// 刻意与当月实际工作日数解耦的固定口径；所有无薪扣款共用，
/// 不要用 `working_days_in_month` 重新推导。
pub const DAILY_RATE_DIVISOR: i64 = 30;

/// Mon–Fri / 8h 默认配置 (配置缺失时的回退值)
pub fn default_schedule(company_id: i64) -> WorkSchedule {
    let now = shared::util::now_millis();
    WorkSchedule {
        id: 0,
        company_id,
        working_hours_per_day: 8.0,
        monday_working: true,
        tuesday_working: true,
        wednesday_working: true,
        thursday_working: true,
        friday_working: true,
        saturday_working: false,
        sunday_working: false,
        working_days_per_week: 5,
        created_at: now,
        updated_at: now,
    }
}

/// 读取公司工作日配置，首次访问时落库默认值
///
/// 任何存储错误都回退内存默认配置 —— 绝不失败。
pub async fn get_config(pool: &SqlitePool, company_id: i64) -> WorkSchedule {
    match work_schedule::get_or_create(pool, company_id).await {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::warn!(
                company_id,
                error = %e,
                "Failed to load work schedule, falling back to default"
            );
            default_schedule(company_id)
        }
    }
}

/// 闭区间 [start, end] 内按掩码统计工作日数
///
/// `end < start` 返回 0；天数为普通非负整数，没有小数天。
pub fn count_working_days(schedule: &WorkSchedule, start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }

    let mut count = 0;
    let mut day = start;
    loop {
        if schedule.is_working(day.weekday()) {
            count += 1;
        }
        if day == end {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    count
}

/// 当月工作日数
///
/// `month` 1–12 由调用方保证；越界返回 0 而不是报错。
pub fn count_working_days_in_month(schedule: &WorkSchedule, month: u32, year: i32) -> i64 {
    let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let end = match if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .and_then(|d| d.pred_opt())
    {
        Some(d) => d,
        None => return 0,
    };
    count_working_days(schedule, start, end)
}

/// 当月工作日数 (按公司配置)
pub async fn working_days_in_month(
    pool: &SqlitePool,
    company_id: i64,
    month: u32,
    year: i32,
) -> i64 {
    let schedule = get_config(pool, company_id).await;
    count_working_days_in_month(&schedule, month, year)
}

/// 闭区间内工作日数 (按公司配置)
pub async fn working_days_between(
    pool: &SqlitePool,
    company_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> i64 {
    let schedule = get_config(pool, company_id).await;
    count_working_days(&schedule, start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_february_2024_default_mask_has_21_working_days() {
        // Leap year, starts on a Thursday
        let schedule = default_schedule(1);
        assert_eq!(count_working_days_in_month(&schedule, 2, 2024), 21);
    }

    #[test]
    fn test_working_days_between_single_week() {
        let schedule = default_schedule(1);
        // Mon 2024-03-04 .. Sun 2024-03-10 → Mon-Fri
        assert_eq!(
            count_working_days(&schedule, date(2024, 3, 4), date(2024, 3, 10)),
            5
        );
    }

    #[test]
    fn test_working_days_between_weekend_only_is_zero() {
        let schedule = default_schedule(1);
        // Sat + Sun
        assert_eq!(
            count_working_days(&schedule, date(2024, 3, 9), date(2024, 3, 10)),
            0
        );
    }

    #[test]
    fn test_inverted_range_is_zero() {
        let schedule = default_schedule(1);
        assert_eq!(
            count_working_days(&schedule, date(2024, 3, 10), date(2024, 3, 4)),
            0
        );
    }

    #[test]
    fn test_single_day_range() {
        let schedule = default_schedule(1);
        // Friday
        assert_eq!(
            count_working_days(&schedule, date(2024, 3, 8), date(2024, 3, 8)),
            1
        );
        // Saturday
        assert_eq!(
            count_working_days(&schedule, date(2024, 3, 9), date(2024, 3, 9)),
            0
        );
    }

    #[test]
    fn test_six_day_week_mask() {
        let mut schedule = default_schedule(1);
        schedule.saturday_working = true;
        schedule.working_days_per_week = schedule.count_working_days();
        assert_eq!(schedule.working_days_per_week, 6);
        // Feb 2024 has 4 Saturdays
        assert_eq!(count_working_days_in_month(&schedule, 2, 2024), 25);
    }

    #[test]
    fn test_invalid_month_counts_zero() {
        let schedule = default_schedule(1);
        assert_eq!(count_working_days_in_month(&schedule, 13, 2024), 0);
        assert_eq!(count_working_days_in_month(&schedule, 0, 2024), 0);
    }

    #[tokio::test]
    async fn test_get_config_materializes_default() {
        let pool = crate::db::test_support::memory_pool().await;
        let company_id = crate::db::test_support::seed_company(&pool, "Acme").await;

        let schedule = get_config(&pool, company_id).await;
        assert_eq!(schedule.working_days_per_week, 5);
        assert!(schedule.monday_working);
        assert!(!schedule.saturday_working);

        // Second read returns the persisted row, not a new one
        let again = get_config(&pool, company_id).await;
        assert_eq!(again.id, schedule.id);
    }

    #[tokio::test]
    async fn test_working_days_in_month_uses_company_mask() {
        let pool = crate::db::test_support::memory_pool().await;
        let company_id = crate::db::test_support::seed_company(&pool, "Acme").await;

        assert_eq!(working_days_in_month(&pool, company_id, 2, 2024).await, 21);

        // Switch to a 6-day week
        crate::db::repository::work_schedule::update(
            &pool,
            company_id,
            shared::models::WorkScheduleUpdate {
                working_hours_per_day: None,
                monday_working: None,
                tuesday_working: None,
                wednesday_working: None,
                thursday_working: None,
                friday_working: None,
                saturday_working: Some(true),
                sunday_working: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(working_days_in_month(&pool, company_id, 2, 2024).await, 25);
    }
}
