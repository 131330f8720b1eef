use anyhow::Result;
use waypoint_api::{build_app, ApiConfig};
use waypoint_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("waypoint_api");

    let config = ApiConfig::from_env()?;
    let bind = config.bind.clone();
    let labels = config.labels.code;

    let app = build_app(config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, labels, "waypoint api started");

    axum::serve(listener, app).await?;
    Ok(())
}
