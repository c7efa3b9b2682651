use voucher_service::services::init_metrics;
use voucher_service::{config::Config, Application};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Metrics recorder must be installed before any metrics are recorded
    init_metrics();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,voucher_service=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let application = Application::build(config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to build application: {}", e))?;
    application.run_until_stopped().await?;

    Ok(())
}
