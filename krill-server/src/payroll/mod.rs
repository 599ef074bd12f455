//! 工资单生成
//!
//! 月薪 = 年薪 / 12；日薪 = 月薪 / 30 (固定口径，见 [`crate::workdays`])。
//! 无薪假按公司工作日掩码裁剪到当月后计数，乘以日薪作为扣减。
//! 固定扣款 (flat / percent-of-salary) 在生成时物化为明细行。
//! 每个 (employee, month, year) 只允许一张工资单，重复生成返回 409。

pub mod money;

use rust_decimal::Decimal;
use serde_json::json;
use sqlx::SqlitePool;

use shared::models::{
    AdjustmentKind, DeductionKind, SalarySlip, SalarySlipGenerate, SalarySlipWithDetails,
};

use crate::auth::CurrentUser;
use crate::db::repository::{employee, fixed_deduction, leave_request, salary_slip};
use crate::db::with_retry;
use crate::services::{NotificationKind, NotificationService};
use crate::utils::{AppError, AppResult, time};
use crate::workdays;

use money::{filter_adjustments, to_decimal, to_f64};

/// 生成工资单
///
/// 先做存在性检查 (409)，再依次计算工作日、无薪假扣减、固定扣款与
/// 临时调整项，最后落库表头 + 明细并通知员工。工资单一经生成不可变更。
pub async fn generate_slip(
    pool: &SqlitePool,
    notifier: &NotificationService,
    acting: &CurrentUser,
    data: SalarySlipGenerate,
) -> AppResult<SalarySlipWithDetails> {
    if !(1..=12).contains(&data.month) {
        return Err(AppError::validation(format!(
            "month must be 1-12, got {}",
            data.month
        )));
    }

    let emp = employee::find_by_id(pool, acting.company_id, data.employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", data.employee_id)))?;

    // One slip per (employee, month, year); regeneration is blocked
    if salary_slip::find_by_employee_month(pool, emp.id, data.month, data.year)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Salary slip for employee {} {}/{} already exists",
            emp.id, data.month, data.year
        )));
    }

    let (month_start, month_end) = time::month_bounds(data.month as u32, data.year as i32)?;
    let schedule = workdays::get_config(pool, acting.company_id).await;
    let total_working_days =
        workdays::count_working_days_in_month(&schedule, data.month as u32, data.year as i32);

    // Approved unpaid leave clipped to the month, counted on the same mask
    let unpaid_requests = leave_request::find_approved_unpaid_overlapping(
        pool,
        acting.company_id,
        emp.id,
        &time::format_date(month_start),
        &time::format_date(month_end),
    )
    .await?;

    let mut unpaid_days: i64 = 0;
    for request in &unpaid_requests {
        let start = time::parse_date(&request.start_date)?.max(month_start);
        let end = time::parse_date(&request.end_date)?.min(month_end);
        unpaid_days += workdays::count_working_days(&schedule, start, end);
    }

    let actual_working_days = total_working_days - unpaid_days;

    // 金额全程 Decimal，落库前统一转 f64 (2dp half-up)
    let monthly_salary = to_decimal(emp.salary) / Decimal::from(12);
    let gross_salary = monthly_salary;
    let daily_rate = monthly_salary / Decimal::from(workdays::DAILY_RATE_DIVISOR);
    let leave_impact = daily_rate * Decimal::from(unpaid_days);

    // Fixed deductions, materialized at generation time
    let fixed = fixed_deduction::find_active_for_employee(pool, acting.company_id, emp.id).await?;
    let mut fixed_components: Vec<(String, Decimal)> = Vec::with_capacity(fixed.len());
    for deduction in &fixed {
        let amount = match deduction.kind {
            DeductionKind::Flat => to_decimal(deduction.value),
            DeductionKind::Percent => {
                monthly_salary * to_decimal(deduction.value) / Decimal::from(100)
            }
        };
        fixed_components.push((deduction.name.clone(), amount));
    }
    let total_fixed_deductions: Decimal = fixed_components.iter().map(|(_, a)| *a).sum();

    // Caller adjustments: invalid items dropped, never fatal
    let adjustments = filter_adjustments(data.adjustments);
    let total_additions: Decimal = adjustments
        .iter()
        .filter(|a| a.kind == AdjustmentKind::Addition)
        .map(|a| to_decimal(a.amount))
        .sum();
    let adjustment_deductions: Decimal = adjustments
        .iter()
        .filter(|a| a.kind == AdjustmentKind::Deduction)
        .map(|a| to_decimal(a.amount))
        .sum();

    let total_deductions = adjustment_deductions + leave_impact + total_fixed_deductions;
    let net_salary = gross_salary + total_additions - total_deductions;

    let slip = SalarySlip {
        id: shared::util::snowflake_id(),
        company_id: acting.company_id,
        employee_id: emp.id,
        month: data.month,
        year: data.year,
        basic_salary: to_f64(monthly_salary),
        total_working_days,
        actual_working_days,
        unpaid_leaves: unpaid_days,
        gross_salary: to_f64(gross_salary),
        total_additions: to_f64(total_additions),
        total_deductions: to_f64(total_deductions),
        net_salary: to_f64(net_salary),
        needs_recalculation: false,
        generated_by: Some(acting.id),
        created_at: shared::util::now_millis(),
    };

    // 并发生成输给唯一索引时，Duplicate → 409
    with_retry(|| salary_slip::insert_header(pool, &slip)).await?;

    // Detail rows: ad hoc adjustments, unpaid leave impact, fixed deductions
    for adjustment in &adjustments {
        salary_slip::insert_detail(pool, slip.id, &adjustment.name, adjustment.kind, adjustment.amount)
            .await?;
    }
    if unpaid_days > 0 {
        salary_slip::insert_detail(
            pool,
            slip.id,
            &format!("Unpaid leave ({unpaid_days} day(s))"),
            AdjustmentKind::Deduction,
            to_f64(leave_impact),
        )
        .await?;
    }
    for (name, amount) in &fixed_components {
        salary_slip::insert_detail(pool, slip.id, name, AdjustmentKind::Deduction, to_f64(*amount))
            .await?;
    }

    let details = salary_slip::find_details(pool, slip.id).await?;

    // Notify the employee with the breakdown (fire-and-forget)
    notifier.send(
        vec![emp.email.clone()],
        NotificationKind::SalarySlipGenerated,
        json!({
            "slip_id": slip.id,
            "month": slip.month,
            "year": slip.year,
            "gross_salary": slip.gross_salary,
            "total_additions": slip.total_additions,
            "total_deductions": slip.total_deductions,
            "net_salary": slip.net_salary,
        }),
    );

    Ok(SalarySlipWithDetails { slip, details })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::db::test_support::{memory_pool, seed_company, seed_employee};
    use shared::models::{AdjustmentInput, FixedDeductionCreate, LeaveStatus};

    fn hr(company_id: i64) -> CurrentUser {
        CurrentUser {
            id: 777,
            role: Role::Hr,
            company_id,
        }
    }

    fn notifier() -> NotificationService {
        NotificationService::new(None)
    }

    /// Insert an HR-approved leave request directly (historical periods
    /// cannot go through submit, which rejects past start dates).
    async fn seed_approved_request(
        pool: &SqlitePool,
        company_id: i64,
        employee_id: i64,
        leave_type_id: i64,
        start: &str,
        end: &str,
        total_days: i64,
    ) {
        let request = crate::db::repository::leave_request::insert(
            pool,
            company_id,
            employee_id,
            leave_type_id,
            start,
            end,
            total_days,
            None,
            None,
            None,
        )
        .await
        .unwrap();
        let applied = crate::db::repository::leave_request::transition_status(
            pool,
            company_id,
            request.id,
            &[LeaveStatus::Pending],
            LeaveStatus::ApprovedByHr,
            None,
        )
        .await
        .unwrap();
        assert!(applied);
    }

    #[tokio::test]
    async fn test_unpaid_leave_reduces_net_by_daily_rate() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        // 360000/year → monthly 30000, daily rate (30000/30) = 1000
        let with_leave =
            seed_employee(&pool, company_id, "With Leave", "2020-01-15", 360000.0, 20).await;
        let without_leave =
            seed_employee(&pool, company_id, "No Leave", "2020-01-15", 360000.0, 20).await;

        // 2 approved unpaid working days in March 2024 (Mon 4th, Tue 5th)
        seed_approved_request(
            &pool,
            company_id,
            with_leave.id,
            3, // Personal Leave (unpaid)
            "2024-03-04",
            "2024-03-05",
            2,
        )
        .await;

        let slip_a = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: with_leave.id,
                month: 3,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await
        .unwrap()
        .slip;

        let slip_b = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: without_leave.id,
                month: 3,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await
        .unwrap()
        .slip;

        // March 2024: 21 working days on the default mask
        assert_eq!(slip_a.total_working_days, 21);
        assert_eq!(slip_a.unpaid_leaves, 2);
        assert_eq!(slip_a.actual_working_days, 19);

        // daily rate (360000/12)/30 = 1000 → leave impact 2000
        assert_eq!(slip_a.basic_salary, 30000.0);
        assert_eq!(slip_a.total_deductions, 2000.0);
        assert_eq!(slip_a.net_salary, 28000.0);

        // Exactly 2000 less than the zero-leave slip
        assert_eq!(slip_b.unpaid_leaves, 0);
        assert_eq!(slip_b.net_salary, 30000.0);
        assert_eq!(slip_b.net_salary - slip_a.net_salary, 2000.0);
    }

    #[tokio::test]
    async fn test_second_generation_conflicts_without_duplicate_rows() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 120000.0, 20).await;

        let first = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 5,
                year: 2024,
                adjustments: vec![AdjustmentInput {
                    name: "Bonus".to_string(),
                    amount: 500.0,
                    kind: AdjustmentKind::Addition,
                }],
            },
        )
        .await
        .unwrap();
        assert_eq!(first.details.len(), 1);

        let second = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 5,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        // No duplicate header or detail rows
        let slips = salary_slip::find_all_for_employee(&pool, company_id, emp.id)
            .await
            .unwrap();
        assert_eq!(slips.len(), 1);
        let details = salary_slip::find_details(&pool, first.slip.id).await.unwrap();
        assert_eq!(details.len(), 1);
    }

    #[tokio::test]
    async fn test_adjustments_additions_and_invalid_items() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 120000.0, 20).await;

        let result = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 6,
                year: 2024,
                adjustments: vec![
                    AdjustmentInput {
                        name: "Referral bonus".to_string(),
                        amount: 800.0,
                        kind: AdjustmentKind::Addition,
                    },
                    AdjustmentInput {
                        name: "Canteen".to_string(),
                        amount: 150.0,
                        kind: AdjustmentKind::Deduction,
                    },
                    // Dropped silently: empty name, non-positive amount
                    AdjustmentInput {
                        name: "".to_string(),
                        amount: 999.0,
                        kind: AdjustmentKind::Addition,
                    },
                    AdjustmentInput {
                        name: "Ghost".to_string(),
                        amount: -10.0,
                        kind: AdjustmentKind::Deduction,
                    },
                ],
            },
        )
        .await
        .unwrap();

        // monthly = 10000; net = 10000 + 800 - 150 = 10650
        assert_eq!(result.slip.basic_salary, 10000.0);
        assert_eq!(result.slip.total_additions, 800.0);
        assert_eq!(result.slip.total_deductions, 150.0);
        assert_eq!(result.slip.net_salary, 10650.0);
        assert_eq!(result.details.len(), 2); // invalid items produced no rows
    }

    #[tokio::test]
    async fn test_fixed_deductions_flat_and_percent() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 120000.0, 20).await;

        // monthly = 10000; flat 200 + 5% of monthly (500) = 700
        fixed_deduction::create(
            &pool,
            company_id,
            FixedDeductionCreate {
                employee_id: emp.id,
                name: "Health insurance".to_string(),
                kind: DeductionKind::Flat,
                value: 200.0,
            },
        )
        .await
        .unwrap();
        fixed_deduction::create(
            &pool,
            company_id,
            FixedDeductionCreate {
                employee_id: emp.id,
                name: "Pension".to_string(),
                kind: DeductionKind::Percent,
                value: 5.0,
            },
        )
        .await
        .unwrap();
        // Inactive deduction must not be materialized
        let parking = fixed_deduction::create(
            &pool,
            company_id,
            FixedDeductionCreate {
                employee_id: emp.id,
                name: "Parking".to_string(),
                kind: DeductionKind::Flat,
                value: 50.0,
            },
        )
        .await
        .unwrap();
        fixed_deduction::update(
            &pool,
            company_id,
            parking.id,
            shared::models::FixedDeductionUpdate {
                name: None,
                kind: None,
                value: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

        let result = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 7,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await
        .unwrap();

        assert_eq!(result.slip.total_deductions, 700.0);
        assert_eq!(result.slip.net_salary, 9300.0);
        assert_eq!(result.details.len(), 2);
        assert!(result.details.iter().all(|d| d.kind == AdjustmentKind::Deduction));
        assert!(!result.details.iter().any(|d| d.name == "Parking"));
    }

    #[tokio::test]
    async fn test_invalid_month_rejected() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 120000.0, 20).await;

        let result = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 13,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cross_company_employee_is_not_found() {
        let pool = memory_pool().await;
        let company_a = seed_company(&pool, "Acme").await;
        let company_b = seed_company(&pool, "Globex").await;
        let emp = seed_employee(&pool, company_a, "Worker", "2020-01-15", 120000.0, 20).await;

        let result = generate_slip(
            &pool,
            &notifier(),
            &hr(company_b),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 5,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unpaid_leave_spanning_month_boundary_is_clipped() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 360000.0, 20).await;

        // Fri 2024-03-29 .. Tue 2024-04-02: 1 working day in March (29th),
        // 2 in April (1st, 2nd)
        seed_approved_request(
            &pool,
            company_id,
            emp.id,
            3,
            "2024-03-29",
            "2024-04-02",
            3,
        )
        .await;

        let march = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 3,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await
        .unwrap()
        .slip;
        assert_eq!(march.unpaid_leaves, 1);
        assert_eq!(march.total_deductions, 1000.0);

        let april = generate_slip(
            &pool,
            &notifier(),
            &hr(company_id),
            SalarySlipGenerate {
                employee_id: emp.id,
                month: 4,
                year: 2024,
                adjustments: vec![],
            },
        )
        .await
        .unwrap()
        .slip;
        assert_eq!(april.unpaid_leaves, 2);
        assert_eq!(april.total_deductions, 2000.0);
    }
}
