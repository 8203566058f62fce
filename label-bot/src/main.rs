//! label-bot: Telegram front end for label sheets
//!
//! Webhook service that:
//! - Greets `/start` with the logo and input format
//! - Turns `Barcode, Part Name, Rack` lines into a PDF label sheet
//! - Sends the sheet back to the chat

mod api;
mod config;
mod error;
mod handlers;
mod logger;
mod state;
mod telegram;
mod transport;

use config::Config;
use state::AppState;
use std::sync::Arc;
use telegram::TelegramClient;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        logo = %config.logo_path.display(),
        failure_policy = ?config.failure_policy,
        "Starting label-bot"
    );

    let transport = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.api_token,
    ));
    let state = AppState::new(&config, transport);
    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("label-bot HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("label-bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
