//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use faq::application::config::BackendKind;
use faq::{AccessControl, FaqSettings, QaStore, SheetQaStore, SqliteQaStore, faq_router};
use platform::clock::{Clock, SystemClock};
use platform::http::{DEFAULT_TIMEOUT, ReqwestTransport};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_CONFIG_PATH: &str = "faq.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:18080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,faq=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Settings file: FAQ_CONFIG, then first argument
    let config_path = env::var("FAQ_CONFIG")
        .ok()
        .or_else(|| env::args().nth(1))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut settings = FaqSettings::load(&config_path)
        .with_context(|| format!("loading settings from {config_path}"))?;

    if let Ok(login) = env::var("FAQ_ADMIN_LOGIN") {
        settings.admin_login = login;
    }
    if let Ok(password) = env::var("FAQ_ADMIN_PASSWORD") {
        settings.admin_password = password;
    }

    let access_config = settings.access_config();
    if access_config.admin_login.is_empty() || access_config.admin_password.is_empty() {
        tracing::warn!("Admin credentials not configured, moderation API is unreachable");
    }

    tracing::info!(
        backend = ?settings.backend,
        ip_protection = access_config.ip_protection,
        cooldown_minutes = access_config.cooldown_minutes,
        "Settings loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let transport = Arc::new(ReqwestTransport::new(DEFAULT_TIMEOUT)?);
    let access = Arc::new(AccessControl::new(
        access_config,
        clock.clone(),
        transport.clone(),
    ));

    // Storage backend
    let store: QaStore<ReqwestTransport> = match settings.backend {
        BackendKind::Sqlite => {
            let url = settings.database_url()?;
            let store = SqliteQaStore::connect(url, clock.clone()).await?;
            store.ensure_schema().await?;
            tracing::info!("Connected to database");
            store.into()
        }
        BackendKind::Sheets => {
            let sheet_config = settings.sheet_config()?;
            SheetQaStore::new(sheet_config, transport.clone(), clock.clone())?.into()
        }
    };
    tracing::info!(backend = store.backend_name(), "Storage backend ready");

    // Build router
    let app = Router::new()
        .merge(faq_router(Arc::new(store), access))
        .layer(TraceLayer::new_for_http());

    // Start server
    let bind_addr = env::var("FAQ_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid FAQ_BIND_ADDR {bind_addr}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
