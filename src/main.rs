use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use aros_catalog_bot::bot::{TelegramTransport, UpdateDispatcher};
use aros_catalog_bot::catalog_sync::CatalogSynchronizer;
use aros_catalog_bot::config::BotConfig;
use aros_catalog_bot::db::CatalogStore;
use aros_catalog_bot::webhook::{build_router, WebhookState};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing BOT_TOKEN or RAILWAY_PUBLIC_DOMAIN stops the process here
    let config = BotConfig::load().context("Invalid bot configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&config)?;

    info!("Starting Aros catalog Telegram bot");
    info!(?config, "Configuration loaded");

    let store = CatalogStore::new(config.database_path.clone());
    let synchronizer = CatalogSynchronizer::new(config.catalog.clone(), store)?;
    let dispatcher = Arc::new(UpdateDispatcher::new(synchronizer)?);

    let bot = Bot::new(config.bot_token.clone());
    let webhook_url = reqwest::Url::parse(&config.webhook_url()).context("Invalid webhook URL")?;
    bot.set_webhook(webhook_url)
        .await
        .context("Failed to register webhook")?;
    info!(domain = %config.webhook_domain, "Webhook registered");

    let transport = Arc::new(TelegramTransport::new(bot)?);
    let app = build_router(
        WebhookState {
            dispatcher,
            transport,
        },
        &config.bot_token,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening for webhook updates");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Bot stopped");
    Ok(())
}

fn init_logging(config: &BotConfig) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .context("BOT_LOG_FILE must name a file")?;
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal, stopping");
}
