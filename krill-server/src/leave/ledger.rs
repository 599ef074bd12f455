//! 请假余额总账
//!
//! 维护不变量：每个 (employee, leave_type, year) 恰好一行，且每次
//! 写入之后 `remaining_days == max(0, total_days - used_days)`。
//!
//! 新数据靠 `UNIQUE (employee_id, leave_type_id, year)` 索引防重；
//! [`deduplicate`] / [`global_cleanup`] 是针对唯一索引之前历史数据的
//! 修复工具 (oldest-wins)，幂等、可与正常流量并发执行。

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

use shared::models::{Employee, LeaveBalance, LeaveType};

use crate::db::repository::{RepoError, RepoResult, leave_balance, leave_type};
use crate::utils::time;

/// Personal Leave 的年度无薪配额 (硬编码政策)
const PERSONAL_LEAVE_DAYS: i64 = 5;
/// 其他无薪假型的年度配额 (硬编码政策)
const UNPAID_DEFAULT_DAYS: i64 = 10;
/// 配额政策按目录名区分 Personal Leave
const PERSONAL_LEAVE_NAME: &str = "Personal Leave";

/// 员工某年度的请假年区间
///
/// 入职当年从 `joining_date` 起，其后从 1 月 1 日起；终点始终 12 月 31 日。
pub fn leave_year_bounds(joining: NaiveDate, year: i32) -> (NaiveDate, NaiveDate) {
    let start = if joining.year() == year {
        joining
    } else {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(joining)
    };
    (start, time::year_end(year))
}

/// 带薪配额折算
///
/// 入职当年: `ceil(entitlement * days_remaining / 365)`，其中
/// `days_remaining` 为请假年区间的闭区间天数；其后年份取全额。
pub fn prorated_entitlement(entitlement: i64, joining: NaiveDate, year: i32) -> i64 {
    if joining.year() != year {
        return entitlement;
    }
    let (start, end) = leave_year_bounds(joining, year);
    let days_remaining = (end - start).num_days() + 1;
    // Integer ceil; both operands are non-negative
    (entitlement.max(0) * days_remaining + 364) / 365
}

/// 无薪假型的固定年度配额
fn unpaid_allocation(leave_type: &LeaveType) -> i64 {
    if leave_type.name == PERSONAL_LEAVE_NAME {
        PERSONAL_LEAVE_DAYS
    } else {
        UNPAID_DEFAULT_DAYS
    }
}

/// 某员工某年度、某假型应得的总天数
fn allocation_for(leave_type: &LeaveType, employee: &Employee, year: i64) -> RepoResult<i64> {
    if !leave_type.is_paid {
        return Ok(unpaid_allocation(leave_type));
    }
    let joining = NaiveDate::parse_from_str(&employee.joining_date, "%Y-%m-%d").map_err(|_| {
        RepoError::Validation(format!(
            "Employee {} has malformed joining_date: {}",
            employee.id, employee.joining_date
        ))
    })?;
    Ok(prorated_entitlement(
        employee.leave_entitlement,
        joining,
        year as i32,
    ))
}

/// 取出员工某年度的全部余额，缺失的假型按折算规则落库
///
/// 注意这是一个可能写库的读路径：`INSERT OR IGNORE` 顶着唯一索引执行，
/// 并发首次访问也不会产生重复行。
pub async fn get_or_create_balances(
    pool: &SqlitePool,
    employee: &Employee,
    year: i64,
) -> RepoResult<Vec<LeaveBalance>> {
    let types = leave_type::find_all(pool).await?;
    let mut balances = Vec::with_capacity(types.len());

    for lt in &types {
        let row = match leave_balance::find_one(pool, employee.id, lt.id, year).await? {
            Some(existing) => existing,
            None => {
                let total = allocation_for(lt, employee, year)?;
                leave_balance::insert_if_absent(
                    pool,
                    employee.company_id,
                    employee.id,
                    lt.id,
                    year,
                    total,
                )
                .await?
            }
        };
        balances.push(row);
    }

    Ok(balances)
}

/// 用量入账：行不存在时先按折算规则落库，再在单条 UPDATE 内应用
/// `used += days, remaining = max(0, total - used)`。
///
/// 只在 HR 批准时调用一次 —— 提交阶段不入账，避免双重扣减。
pub async fn record_usage(
    pool: &SqlitePool,
    employee: &Employee,
    leave_type_id: i64,
    year: i64,
    days: i64,
) -> RepoResult<LeaveBalance> {
    if days < 0 {
        return Err(RepoError::Validation(format!(
            "Usage days cannot be negative: {days}"
        )));
    }

    if leave_balance::find_one(pool, employee.id, leave_type_id, year)
        .await?
        .is_none()
    {
        let lt = leave_type::find_by_id(pool, leave_type_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave type {leave_type_id} not found")))?;
        let total = allocation_for(&lt, employee, year)?;
        leave_balance::insert_if_absent(
            pool,
            employee.company_id,
            employee.id,
            leave_type_id,
            year,
            total,
        )
        .await?;
    }

    leave_balance::apply_usage(pool, employee.id, leave_type_id, year, days).await
}

/// 单员工单年度去重：每个假型保留最老的一行 (created_at, id 次序)，
/// 删除其余；返回清理后的余额集。对干净数据是只读操作，因此幂等。
pub async fn deduplicate(
    pool: &SqlitePool,
    employee_id: i64,
    year: i64,
) -> RepoResult<Vec<LeaveBalance>> {
    let rows = leave_balance::find_by_employee_year(pool, employee_id, year).await?;

    let mut kept: HashSet<i64> = HashSet::new();
    for row in &rows {
        if !kept.insert(row.leave_type_id) {
            // Not the oldest of its group (rows are ordered oldest-first)
            if let Err(e) = leave_balance::delete_by_id(pool, row.id).await {
                // 并发清理可能已删掉同一行；继续处理其余行
                tracing::warn!(balance_id = row.id, error = %e, "Dedup delete failed");
            }
        }
    }

    leave_balance::find_by_employee_year(pool, employee_id, year).await
}

/// 全量清理：按 (employee, leave_type, year) 分组做同样的 oldest-wins
/// 修复，返回删除的行数。进程启动时执行一次，也可由管理员随时触发；
/// 与正常流量并发执行时丢失个别删除是可接受的，下一轮还会收敛。
pub async fn global_cleanup(pool: &SqlitePool) -> RepoResult<u64> {
    let rows = leave_balance::find_all(pool).await?;

    let mut removed = 0u64;
    let mut kept: HashSet<(i64, i64, i64)> = HashSet::new();
    for row in &rows {
        let key = (row.employee_id, row.leave_type_id, row.year);
        if !kept.insert(key) {
            match leave_balance::delete_by_id(pool, row.id).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(balance_id = row.id, error = %e, "Cleanup delete failed");
                }
            }
        }
    }

    Ok(removed)
}
