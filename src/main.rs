use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use product_pricer::config::Settings;
use product_pricer::server::{build_app, AppState};
use product_pricer::services::ProductPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,product_pricer=debug,tower_http=debug".into()),
        )
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    if settings.vision.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every analysis will report an error");
    }

    let pipeline = ProductPipeline::from_settings(&settings).context("Failed to build pipeline")?;
    let app = build_app(AppState::new(pipeline), &settings.server);

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        address = %addr,
        model = %settings.vision.model,
        max_tokens = settings.vision.max_tokens,
        "Starting server"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
