// Main entry point for the post review server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use server_core::domains::platforms::activities::ensure_default_platforms;
use server_core::domains::platforms::store::InMemoryPlatformStore;
use server_core::domains::posts::store::InMemoryPostStore;
use server_core::domains::settings::store::InMemorySettingsStore;
use server_core::kernel::scheduled_tasks::start_scheduler;
use server_core::kernel::traits::BasePostArchive;
use server_core::kernel::{HttpPublisher, NullArchive, OpenAIClient, ServerDeps, SheetsArchive};
use server_core::server::build_app;
use server_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting post review server");

    let config = Config::from_env().context("Failed to load configuration")?;

    // In-memory stores; persistence is delegated to the external archive
    let platforms = Arc::new(InMemoryPlatformStore::new());
    let posts = Arc::new(InMemoryPostStore::new());
    let settings = Arc::new(InMemorySettingsStore::new());

    let seeded = ensure_default_platforms(platforms.as_ref()).await?;
    if seeded > 0 {
        tracing::info!(seeded, "Seeded default platforms");
    }

    let generator = Arc::new(OpenAIClient::new(config.openai_api_key.clone()));
    let publisher = Arc::new(HttpPublisher::new(config.publish_endpoint.clone()));

    let archive: Arc<dyn BasePostArchive> =
        match (&config.sheets_api_key, &config.sheets_spreadsheet_id) {
            (Some(key), Some(sheet)) => {
                tracing::info!("Using Google Sheets post archive");
                Arc::new(SheetsArchive::new(key.clone(), sheet.clone()))
            }
            _ => {
                tracing::info!("Sheets archive not configured, archive calls are no-ops");
                Arc::new(NullArchive)
            }
        };

    let deps = ServerDeps::new(
        platforms,
        posts,
        settings,
        generator,
        publisher,
        archive,
        Duration::from_secs(config.gateway_timeout_secs),
    );

    // Keep the scheduler handle alive for the life of the process
    let _scheduler = start_scheduler(deps.clone(), &config.schedule_cron)
        .await
        .context("Failed to start generation scheduler")?;

    let app = build_app(deps);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
