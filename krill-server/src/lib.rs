//! Krill HR Server - 多租户人事 / 薪酬管理后端
//!
//! # 架构概述
//!
//! 本模块是 HR 后端的主入口，提供以下核心功能：
//!
//! - **工作日历** (`workdays`): 按公司工作日掩码计算工作日 / 请假天数
//! - **请假总账** (`leave::ledger`): 余额创建 (含入职年折算)、用量入账、去重修复
//! - **审批流** (`leave::workflow`): 请假申请从提交到组长 / HR 审批的状态机
//! - **薪酬** (`payroll`): 工资单生成 (无薪假扣减、固定扣款、临时调整)
//! - **数据库** (`db`): SQLite 存储 + 迁移 + 瞬时故障重试
//! - **认证** (`auth`): JWT 验证、角色与公司隔离上下文
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! krill-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (repository per table)
//! ├── leave/         # 请假总账 + 审批流
//! ├── payroll/       # 工资单生成
//! ├── services/      # 通知服务
//! ├── workdays.rs    # 工作日历
//! └── utils/         # 错误、日志、日期、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod leave;
pub mod payroll;
pub mod services;
pub mod utils;
pub mod workdays;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __ __      _ ______
   / //_/_____(_) / / /
  / ,<  / ___/ / / / /
 / /| |/ /  / / / / /
/_/ |_/_/  /_/_/_/_/
    "#
    );
}
