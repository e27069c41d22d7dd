use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nss_server::config::AppConfig;
use nss_server::state::AppState;
use nss_server::{database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    seed::seed_role_permissions(&db)
        .await
        .context("Failed to seed role permissions")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;
    if let Some(ref admin) = config.auth.bootstrap_admin {
        seed::ensure_bootstrap_admin(&db, admin).await?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = nss_server::build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
