use krill_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment().map_err(|e| anyhow::anyhow!("Failed to set up environment: {e}"))?;

    // 打印横幅
    print_banner();

    tracing::info!("Krill HR Server starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 初始化服务器状态 (数据库 + 迁移 + 服务)
    let state = ServerState::initialize(&config).await;

    // 4. 启动 HTTP 服务器 (run 内先执行启动维护)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(anyhow::anyhow!(e.to_string()));
    }

    Ok(())
}
