use shop_server::{Config, DbService, StatusScheduler, init_logger_with_file};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, working directory, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = format!("{}/logs", config.work_dir);
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(&config.log_level, Some(&log_dir));

    tracing::info!(environment = %config.environment, "Shop server starting...");

    // 2. Database (pool + migrations)
    let db = DbService::new(&config.database_path()).await?;

    // 3. Background delivery scheduler
    let shutdown = CancellationToken::new();
    let scheduler = StatusScheduler::new(&db, &config, shutdown.clone());
    let worker = tokio::spawn(scheduler.run());

    // 4. Run until ctrl-c, then stop the worker gracefully
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    shutdown.cancel();
    let _ = worker.await;

    Ok(())
}
