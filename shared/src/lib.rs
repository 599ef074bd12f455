//! Krill 共享类型库
//!
//! 服务器与客户端共享的数据模型和工具函数：
//!
//! - **数据模型** (`models`): 公司、员工、请假、工资单等实体
//! - **工具函数** (`util`): 时间戳、Snowflake ID 生成
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`
//! so that frontend-facing builds never pull in sqlx.

pub mod models;
pub mod util;
