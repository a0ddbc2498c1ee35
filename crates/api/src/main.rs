use justice_api::app::{build_app, services::build_services};
use justice_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    justice_observability::init();

    let config = AppConfig::from_env()?;
    let services = build_services(&config).await?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("justice lawyer server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
