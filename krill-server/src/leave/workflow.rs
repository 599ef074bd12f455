//! 请假审批流
//!
//! 状态机：`PENDING -> APPROVED_BY_TEAM_LEAD -> APPROVED_BY_HR` (成功终态)，
//! `PENDING | APPROVED_BY_TEAM_LEAD -> REJECTED` (失败终态)。组长审批可选，
//! HR 可以直接从 `PENDING` 决策。
//!
//! 状态转移用条件 UPDATE 原子执行；对终态请求再次决策返回 409 冲突，
//! 不会静默接受。用量只在 HR 批准时入账一次。

use chrono::Datelike;
use serde_json::json;
use sqlx::SqlitePool;

use shared::models::{
    ApprovalDecision, LeaveDecision, LeaveRequest, LeaveRequestCreate, LeaveStatus,
};

use crate::auth::{CurrentUser, Role};
use crate::db::repository::{employee, leave_request, leave_type, salary_slip};
use crate::db::with_retry;
use crate::leave::ledger;
use crate::services::{NotificationKind, NotificationService};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, time};
use crate::workdays;

/// 提交请假申请
///
/// 日期校验最先执行，失败时不留任何痕迹 (无请求行、无余额变动)。
/// 提交只物化年度余额，不入账用量。
pub async fn submit(
    pool: &SqlitePool,
    notifier: &NotificationService,
    acting: &CurrentUser,
    data: LeaveRequestCreate,
) -> AppResult<LeaveRequest> {
    // 1. Validate dates before any side effect
    let start = time::parse_date(&data.start_date)?;
    let end = time::parse_date(&data.end_date)?;
    let today = time::today();

    if start < today {
        return Err(AppError::validation(format!(
            "start_date {} is in the past (today is {})",
            data.start_date, today
        )));
    }
    if end < start {
        return Err(AppError::validation(format!(
            "end_date {} is before start_date {}",
            data.end_date, data.start_date
        )));
    }
    validate_optional_text(&data.reason, "reason", MAX_NOTE_LEN)?;

    // 2. Resolve the requesting employee (HR may submit on behalf of others)
    let employee_id = match data.employee_id {
        Some(id) if id != acting.id => {
            if !acting.is_hr_tier() {
                return Err(AppError::forbidden(
                    "Only HR can submit leave on behalf of another employee",
                ));
            }
            id
        }
        _ => acting.id,
    };

    let emp = employee::find_by_id(pool, acting.company_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

    // 3. Validate the leave type
    let lt = leave_type::find_by_id(pool, data.leave_type_id)
        .await?
        .ok_or_else(|| {
            AppError::validation(format!("Unknown leave type: {}", data.leave_type_id))
        })?;

    // 4. Size the request with the company calendar
    let total_days = workdays::working_days_between(pool, acting.company_id, start, end).await;

    // 5. Insert as PENDING with routing copied from the employee
    let request = leave_request::insert(
        pool,
        acting.company_id,
        emp.id,
        lt.id,
        &data.start_date,
        &data.end_date,
        total_days,
        data.reason.as_deref(),
        emp.team_lead_id,
        emp.created_by,
    )
    .await?;

    // 6. Materialize this year's balances; usage is applied at HR approval
    let year = today.year() as i64;
    with_retry(|| ledger::get_or_create_balances(pool, &emp, year)).await?;

    // 7. Notify HR (fire-and-forget)
    let hr_recipients = match emp.created_by {
        Some(hr_id) => employee::find_by_id(pool, acting.company_id, hr_id)
            .await
            .ok()
            .flatten()
            .map(|hr| vec![hr.email])
            .unwrap_or_default(),
        None => Vec::new(),
    };
    notifier.send(
        hr_recipients,
        NotificationKind::LeaveRequestSubmitted,
        json!({
            "request_id": request.id,
            "employee": emp.full_name,
            "leave_type": lt.name,
            "start_date": request.start_date,
            "end_date": request.end_date,
            "total_days": request.total_days,
        }),
    );

    Ok(request)
}

/// 审批请假申请
///
/// 组长路径只能从 `PENDING` 出发且不碰总账；HR 路径可从 `PENDING` 或
/// `APPROVED_BY_TEAM_LEAD` 出发，批准时入账用量，无薪假还会标记已生成
/// 工资单需要重算。任何终态通知员工。
pub async fn decide(
    pool: &SqlitePool,
    notifier: &NotificationService,
    acting: &CurrentUser,
    request_id: i64,
    data: LeaveDecision,
) -> AppResult<LeaveRequest> {
    validate_optional_text(&data.remarks, "remarks", MAX_NOTE_LEN)?;

    // Company-scoped lookup: a foreign request is a 404, never a 403
    let request = leave_request::find_by_id(pool, acting.company_id, request_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave request {request_id} not found")))?;

    match acting.role {
        Role::TeamLead => {
            decide_team_lead(pool, acting, &request, &data).await?;
        }
        role if role.is_hr_tier() => {
            decide_hr(pool, acting, &request, &data).await?;
        }
        _ => {
            return Err(AppError::forbidden(
                "Only team leads or HR can decide leave requests",
            ));
        }
    }

    let updated = leave_request::find_by_id(pool, acting.company_id, request_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave request {request_id} not found")))?;

    // Terminal decisions notify the employee (fire-and-forget)
    if updated.status.is_terminal() {
        if let Ok(Some(emp)) =
            employee::find_by_id(pool, acting.company_id, updated.employee_id).await
        {
            notifier.send(
                vec![emp.email],
                NotificationKind::LeaveRequestDecided,
                json!({
                    "request_id": updated.id,
                    "status": updated.status,
                    "remarks": updated.remarks,
                }),
            );
        }
    }

    Ok(updated)
}

/// 组长决策：只处理路由给自己的 `PENDING` 请求，不触碰总账
async fn decide_team_lead(
    pool: &SqlitePool,
    acting: &CurrentUser,
    request: &LeaveRequest,
    data: &LeaveDecision,
) -> AppResult<()> {
    if request.team_lead_id != Some(acting.id) {
        return Err(AppError::forbidden(
            "Leave request is not routed to this team lead",
        ));
    }

    let to = match data.decision {
        ApprovalDecision::Approve => LeaveStatus::ApprovedByTeamLead,
        ApprovalDecision::Reject => LeaveStatus::Rejected,
    };

    let applied = leave_request::transition_status(
        pool,
        acting.company_id,
        request.id,
        &[LeaveStatus::Pending],
        to,
        data.remarks.as_deref(),
    )
    .await?;

    if !applied {
        return Err(AppError::conflict(format!(
            "Leave request {} has already been decided",
            request.id
        )));
    }
    Ok(())
}

/// HR 决策：批准时入账用量 (恰好一次)，无薪假标记工资单重算
async fn decide_hr(
    pool: &SqlitePool,
    acting: &CurrentUser,
    request: &LeaveRequest,
    data: &LeaveDecision,
) -> AppResult<()> {
    let to = match data.decision {
        ApprovalDecision::Approve => LeaveStatus::ApprovedByHr,
        ApprovalDecision::Reject => LeaveStatus::Rejected,
    };

    let applied = leave_request::transition_status(
        pool,
        acting.company_id,
        request.id,
        &[LeaveStatus::Pending, LeaveStatus::ApprovedByTeamLead],
        to,
        data.remarks.as_deref(),
    )
    .await?;

    if !applied {
        return Err(AppError::conflict(format!(
            "Leave request {} has already been decided",
            request.id
        )));
    }

    if data.decision == ApprovalDecision::Reject {
        return Ok(());
    }

    // Approval: reconcile the ledger for the current year, exactly once
    let emp = employee::find_by_id(pool, acting.company_id, request.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Employee {} not found", request.employee_id))
        })?;

    let year = time::today().year() as i64;
    with_retry(|| ledger::record_usage(pool, &emp, request.leave_type_id, year, request.total_days))
        .await?;

    // Unpaid leave invalidates an already-generated slip for the start month
    let lt = leave_type::find_by_id(pool, request.leave_type_id)
        .await?
        .ok_or_else(|| {
            AppError::validation(format!("Unknown leave type: {}", request.leave_type_id))
        })?;

    if !lt.is_paid {
        let start = time::parse_date(&request.start_date)?;
        let flagged = salary_slip::flag_needs_recalculation(
            pool,
            emp.id,
            start.month() as i64,
            start.year() as i64,
        )
        .await?;
        if flagged {
            tracing::info!(
                employee_id = emp.id,
                month = start.month(),
                year = start.year(),
                "Existing salary slip flagged for recalculation after unpaid leave approval"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::leave_balance;
    use crate::db::test_support::{memory_pool, seed_company, seed_employee};
    use chrono::Duration;

    fn hr_user(company_id: i64, id: i64) -> CurrentUser {
        CurrentUser {
            id,
            role: Role::Hr,
            company_id,
        }
    }

    fn lead_user(company_id: i64, id: i64) -> CurrentUser {
        CurrentUser {
            id,
            role: Role::TeamLead,
            company_id,
        }
    }

    fn employee_user(company_id: i64, id: i64) -> CurrentUser {
        CurrentUser {
            id,
            role: Role::Employee,
            company_id,
        }
    }

    fn notifier() -> NotificationService {
        // Log-only mode: no webhook configured
        NotificationService::new(None)
    }

    fn iso(date: chrono::NaiveDate) -> String {
        time::format_date(date)
    }

    /// A future Monday, far enough out that tests never straddle "today"
    fn future_start() -> chrono::NaiveDate {
        let mut d = time::today() + Duration::days(30);
        while d.weekday() != chrono::Weekday::Mon {
            d = d.succ_opt().unwrap();
        }
        d
    }

    async fn submit_simple(
        pool: &SqlitePool,
        acting: &CurrentUser,
        leave_type_id: i64,
        days_span: i64,
    ) -> AppResult<LeaveRequest> {
        let start = future_start();
        let end = start + Duration::days(days_span - 1);
        submit(
            pool,
            &notifier(),
            acting,
            LeaveRequestCreate {
                employee_id: None,
                leave_type_id,
                start_date: iso(start),
                end_date: iso(end),
                reason: Some("family matters".to_string()),
            },
        )
        .await
    }

    #[tokio::test]
    async fn test_submit_creates_pending_request_sized_by_calendar() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;

        // Mon..Fri + weekend + Mon-Tue = 7 working days over 9 calendar days
        let request = submit_simple(&pool, &employee_user(company_id, emp.id), 1, 9)
            .await
            .unwrap();

        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.total_days, 7);
        assert_eq!(request.employee_id, emp.id);

        // Balances materialized, usage NOT yet applied
        let year = time::today().year() as i64;
        let balances = leave_balance::find_by_employee_year(&pool, emp.id, year)
            .await
            .unwrap();
        assert_eq!(balances.len(), 3);
        assert!(balances.iter().all(|b| b.used_days == 0));
    }

    #[tokio::test]
    async fn test_submit_past_start_date_leaves_no_trace() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;

        let yesterday = time::today() - Duration::days(1);
        let result = submit(
            &pool,
            &notifier(),
            &employee_user(company_id, emp.id),
            LeaveRequestCreate {
                employee_id: None,
                leave_type_id: 1,
                start_date: iso(yesterday),
                end_date: iso(yesterday + Duration::days(2)),
                reason: None,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));

        // No request row, no balance row
        let requests = leave_request::find_by_employee(&pool, company_id, emp.id)
            .await
            .unwrap();
        assert!(requests.is_empty());
        let year = time::today().year() as i64;
        let balances = leave_balance::find_by_employee_year(&pool, emp.id, year)
            .await
            .unwrap();
        assert!(balances.is_empty());
    }

    #[tokio::test]
    async fn test_submit_end_before_start_rejected() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;

        let start = future_start();
        let result = submit(
            &pool,
            &notifier(),
            &employee_user(company_id, emp.id),
            LeaveRequestCreate {
                employee_id: None,
                leave_type_id: 1,
                start_date: iso(start),
                end_date: iso(start - Duration::days(1)),
                reason: None,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_unknown_leave_type_rejected() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;

        let result = submit_simple(&pool, &employee_user(company_id, emp.id), 999, 3).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_employee_cannot_submit_for_someone_else() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;
        let other = seed_employee(&pool, company_id, "Other", "2020-01-15", 90000.0, 20).await;

        let start = future_start();
        let result = submit(
            &pool,
            &notifier(),
            &employee_user(company_id, emp.id),
            LeaveRequestCreate {
                employee_id: Some(other.id),
                leave_type_id: 1,
                start_date: iso(start),
                end_date: iso(start),
                reason: None,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_hr_approval_applies_usage_exactly_once() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;
        let hr = hr_user(company_id, 777);

        let request = submit_simple(&pool, &employee_user(company_id, emp.id), 1, 5)
            .await
            .unwrap();
        assert_eq!(request.total_days, 5);

        let decided = decide(
            &pool,
            &notifier(),
            &hr,
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: Some("enjoy".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(decided.status, LeaveStatus::ApprovedByHr);

        let year = time::today().year() as i64;
        let balance = leave_balance::find_one(&pool, emp.id, 1, year)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(balance.used_days, 5); // once, not twice
        assert_eq!(balance.remaining_days, balance.total_days - 5);
    }

    #[tokio::test]
    async fn test_redeciding_terminal_request_conflicts() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;
        let hr = hr_user(company_id, 777);

        let request = submit_simple(&pool, &employee_user(company_id, emp.id), 1, 3)
            .await
            .unwrap();

        decide(
            &pool,
            &notifier(),
            &hr,
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: None,
            },
        )
        .await
        .unwrap();

        // Second decision — approve or reject — must conflict, not be absorbed
        let again = decide(
            &pool,
            &notifier(),
            &hr,
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Reject,
                remarks: None,
            },
        )
        .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        // Usage not double-counted by the failed retry
        let year = time::today().year() as i64;
        let balance = leave_balance::find_one(&pool, emp.id, 1, year)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(balance.used_days, request.total_days);
    }

    #[tokio::test]
    async fn test_team_lead_path_then_hr_path() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let lead = seed_employee(&pool, company_id, "Lead", "2019-01-01", 120000.0, 25).await;
        let emp = crate::db::repository::employee::create(
            &pool,
            company_id,
            Some(999),
            shared::models::EmployeeCreate {
                full_name: "Worker".to_string(),
                email: "worker@example.com".to_string(),
                joining_date: "2020-01-15".to_string(),
                salary: 90000.0,
                leave_entitlement: 20,
                team_lead_id: Some(lead.id),
                account_id: None,
            },
        )
        .await
        .unwrap();

        let request = submit_simple(&pool, &employee_user(company_id, emp.id), 1, 3)
            .await
            .unwrap();

        // Team lead approves: no ledger movement
        let decided = decide(
            &pool,
            &notifier(),
            &lead_user(company_id, lead.id),
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(decided.status, LeaveStatus::ApprovedByTeamLead);

        let year = time::today().year() as i64;
        let balance = leave_balance::find_one(&pool, emp.id, 1, year)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(balance.used_days, 0);

        // Team lead cannot decide again from APPROVED_BY_TEAM_LEAD
        let again = decide(
            &pool,
            &notifier(),
            &lead_user(company_id, lead.id),
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Reject,
                remarks: None,
            },
        )
        .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        // HR completes the flow and the ledger moves
        let decided = decide(
            &pool,
            &notifier(),
            &hr_user(company_id, 777),
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(decided.status, LeaveStatus::ApprovedByHr);

        let balance = leave_balance::find_one(&pool, emp.id, 1, year)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(balance.used_days, request.total_days);
    }

    #[tokio::test]
    async fn test_employee_role_cannot_decide() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 90000.0, 20).await;

        let request = submit_simple(&pool, &employee_user(company_id, emp.id), 1, 3)
            .await
            .unwrap();

        let result = decide(
            &pool,
            &notifier(),
            &employee_user(company_id, emp.id),
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: None,
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_company_isolation_yields_not_found() {
        let pool = memory_pool().await;
        let company_a = seed_company(&pool, "Acme").await;
        let company_b = seed_company(&pool, "Globex").await;
        let emp = seed_employee(&pool, company_a, "Worker", "2020-01-15", 90000.0, 20).await;

        let request = submit_simple(&pool, &employee_user(company_a, emp.id), 1, 3)
            .await
            .unwrap();

        // HR of company B sees a 404, never the request's data
        let result = decide(
            &pool,
            &notifier(),
            &hr_user(company_b, 888),
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: None,
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // Request untouched
        let unchanged = leave_request::find_by_id(&pool, company_a, request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, LeaveStatus::Pending);
    }

    #[tokio::test]
    async fn test_unpaid_approval_flags_existing_slip() {
        let pool = memory_pool().await;
        let company_id = seed_company(&pool, "Acme").await;
        let emp = seed_employee(&pool, company_id, "Worker", "2020-01-15", 360000.0, 20).await;
        let hr = hr_user(company_id, 777);

        // Personal Leave (unpaid) in a future month
        let request = submit_simple(&pool, &employee_user(company_id, emp.id), 3, 2)
            .await
            .unwrap();
        let start = time::parse_date(&request.start_date).unwrap();

        // A slip for that period already exists
        let slip = shared::models::SalarySlip {
            id: shared::util::snowflake_id(),
            company_id,
            employee_id: emp.id,
            month: start.month() as i64,
            year: start.year() as i64,
            basic_salary: 30000.0,
            total_working_days: 21,
            actual_working_days: 21,
            unpaid_leaves: 0,
            gross_salary: 30000.0,
            total_additions: 0.0,
            total_deductions: 0.0,
            net_salary: 30000.0,
            needs_recalculation: false,
            generated_by: Some(hr.id),
            created_at: shared::util::now_millis(),
        };
        salary_slip::insert_header(&pool, &slip).await.unwrap();

        decide(
            &pool,
            &notifier(),
            &hr,
            request.id,
            LeaveDecision {
                decision: ApprovalDecision::Approve,
                remarks: None,
            },
        )
        .await
        .unwrap();

        let flagged = salary_slip::find_by_employee_month(
            &pool,
            emp.id,
            start.month() as i64,
            start.year() as i64,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(flagged.needs_recalculation);
    }
}
