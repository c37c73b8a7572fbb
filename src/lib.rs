pub mod api; // HTTP interface: router, policy, pages, handlers
pub mod bootstrap;
pub mod config;
pub mod crypto;
pub mod db;
pub mod models;
pub mod session;

use tracing_subscriber::EnvFilter;

use crate::api::{ApiContext, ServerError};
use crate::config::AppConfig;

/// Run the clinic server until Ctrl-C.
pub async fn run() -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr;
    let ctx = ApiContext::new(config)?;
    bootstrap::initialize(&ctx)?;

    let server = api::start_server_on(ctx, bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.stop().await
}
