//! Leave Domain
//!
//! - [`ledger`] - 余额总账：创建 (含折算)、用量入账、去重修复
//! - [`workflow`] - 请假审批状态机

pub mod ledger;
pub mod workflow;
