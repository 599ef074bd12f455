//! Database Models
//!
//! Row types and request/response payloads shared between server and client.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

// Tenant
pub mod company;
pub mod work_schedule;

// People
pub mod employee;

// Leave
pub mod leave_type;
pub mod leave_balance;
pub mod leave_request;

// Payroll
pub mod salary_slip;
pub mod fixed_deduction;

// Calendar
pub mod calendar_event;

// Re-exports
pub use company::{Company, CompanyCreate};
pub use work_schedule::{WorkSchedule, WorkScheduleUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeUpdate};
pub use leave_type::LeaveType;
pub use leave_balance::{LeaveBalance, LeaveBalanceWithType};
pub use leave_request::{
    ApprovalDecision, LeaveDecision, LeaveRequest, LeaveRequestCreate, LeaveStatus,
};
pub use salary_slip::{
    AdjustmentInput, AdjustmentKind, SalarySlip, SalarySlipDetail, SalarySlipGenerate,
    SalarySlipWithDetails,
};
pub use fixed_deduction::{
    DeductionKind, FixedDeduction, FixedDeductionCreate, FixedDeductionUpdate,
};
pub use calendar_event::{CalendarEvent, CalendarEventCreate, CalendarEventUpdate};
