use anyhow::Context;
use chrono::Utc;

use jobboard_api::{ApiConfig, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    jobboard_observability::init();

    let config = ApiConfig::from_env();
    let services = app::build_services(&config).await?;

    let admin = services
        .board
        .bootstrap_admin(&config.admin_seed(), Utc::now())
        .await
        .context("failed to seed the admin account")?;
    tracing::info!(admin_id = %admin.id, "admin account ready");

    let addr = config.bind_addr();
    let app = app::build_app(services, config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
