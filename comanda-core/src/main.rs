use comanda_core::core::tasks::BackgroundTasks;
use comanda_core::{Config, CoreState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量与配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志
    setup_environment(&config)?;
    print_banner();

    tracing::info!(
        work_dir = %config.work_dir.display(),
        database = %config.database_path.display(),
        timezone = %config.timezone,
        environment = %config.environment,
        "Comanda starting..."
    );

    // 3. 初始化核心状态
    let state = CoreState::initialize(&config).await?;
    let flags = state.settings.flags();
    tracing::info!(
        business = %flags.business_name,
        use_tables = flags.use_tables,
        allow_tableless_orders = flags.allow_tableless_orders,
        generate_tickets = flags.generate_tickets,
        use_user_system = flags.use_user_system,
        "Configuration loaded"
    );

    // 4. 后台任务
    let mut tasks = BackgroundTasks::new();
    let _board = state.start_background_tasks(&mut tasks);
    tasks.log_summary();

    let stats = state.tables.stats().await?;
    let orders = state.orders.today_stats().await?;
    tracing::info!(
        tables = stats.total(),
        available = stats.available,
        occupied = stats.occupied,
        active_orders = orders.active_total,
        "Ready"
    );

    // 5. 等待退出信号
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    tasks.shutdown().await;
    state.pool.close().await;
    tracing::info!("Comanda stopped");
    Ok(())
}
