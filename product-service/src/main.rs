use product_service::config::ProductConfig;
use product_service::startup::Application;
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProductConfig::load()?;

    // Must be installed before the first request records anything.
    init_metrics()?;
    init_tracing(
        "product-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start product-service: {}", e);
        e
    })?;

    app.run_until_stopped().await?;
    Ok(())
}
