use market_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载 .env 与配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志 (guard 必须活到进程结束)
    let _log_guard = setup_environment(&config);

    print_banner();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Market server starting..."
    );

    // 3. 初始化服务器状态 (目录、数据库迁移、服务)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
