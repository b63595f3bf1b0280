use anyhow::{Context, Result};
use random_user_feed::config::Config;
use random_user_feed::{tui, RandomDataApi, UserFeedController};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default(Path::new("config.toml"))?;

    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file: {}", config.logging.file))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let dump_mode = std::env::args().any(|arg| arg == "--dump");

    let source = RandomDataApi::new(&config.api)?;
    let controller = Arc::new(UserFeedController::new(source, &config.feed));
    tracing::info!(base_url = %config.api.base_url, dump_mode, "starting");

    if dump_mode {
        controller.on_mount().await;
        for record in controller.snapshot().records() {
            println!("{}", serde_json::to_string(record)?);
        }
        return Ok(());
    }

    let result = tui::run_tui(controller, &config.ui).await;
    tracing::debug!("shutting down");
    result
}
