use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::leave::ledger;
use crate::services::NotificationService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / Pool 浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 验证服务 |
/// | notifier | NotificationService | 通知服务 (fire-and-forget) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 通知服务
    pub notifier: NotificationService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/krill.db) + 迁移
    /// 3. JWT / 通知服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure work_dir structure exists
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        // 1. Initialize DB
        let db_path = config.database_dir().join("krill.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");

        // 2. Initialize Services
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let notifier = NotificationService::new(config.notify_webhook_url.clone());

        Self {
            config: config.clone(),
            pool: db_service.pool,
            jwt_service,
            notifier,
        }
    }

    /// 启动时维护任务
    ///
    /// 必须在 `Server::run()` 接收流量之前调用。
    ///
    /// 显式执行一次全量余额清理：唯一索引上线后新数据不会再产生重复行，
    /// 这一遍只修复历史数据。
    pub async fn run_startup_maintenance(&self) {
        match ledger::global_cleanup(&self.pool).await {
            Ok(removed) if removed > 0 => {
                tracing::info!("Startup ledger cleanup removed {} duplicate balance row(s)", removed);
            }
            Ok(_) => {
                tracing::debug!("Startup ledger cleanup found no duplicates");
            }
            Err(e) => {
                // 清理失败不阻塞启动，下次访问时 get_or_create/dedup 仍可自愈
                tracing::error!("Startup ledger cleanup failed: {}", e);
            }
        }
    }
}
