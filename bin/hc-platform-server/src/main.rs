//! Holacracy Platform Server
//!
//! Serves the platform REST APIs, Swagger UI and a health probe.
//!
//! ## Configuration
//!
//! Settings come from a TOML file (`HOLACRACY_CONFIG`, or `config.toml` /
//! `holacracy.toml` in the usual places) with `HOLACRACY_*` environment
//! overrides:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HOLACRACY_HTTP_PORT` | `8080` | HTTP API port |
//! | `HOLACRACY_DATABASE_URL` | `sqlite://holacracy.db?mode=rwc` | SQLite database URL |
//! | `HOLACRACY_IDENTITY_MODE` | `oidc` | `oidc` or `static` (dev mode only) |
//! | `HOLACRACY_OIDC_ISSUER_URL` | - | OIDC issuer |
//! | `HOLACRACY_OIDC_AUDIENCE` | - | Expected `aud` claim |
//! | `HOLACRACY_DEV_MODE` | `false` | Development mode |
//! | `LOG_FORMAT` | `text` | `json` or `text` |
//! | `RUST_LOG` | `info` | Log level |

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

use hc_config::ConfigLoader;
use hc_platform::identity::resolver_from_config;
use hc_platform::shared::database;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::new().load().context("failed to load configuration")?;

    hc_common::init_logging("hc-platform-server", config.logging.format);

    config.validate().context("invalid configuration")?;

    info!("Starting Holacracy Platform Server");
    if config.dev_mode {
        warn!("Development mode is enabled");
    }

    info!(url = %config.database.url, "Connecting to database");
    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    database::initialize_schema(&pool)
        .await
        .context("failed to initialise schema")?;

    let resolver = resolver_from_config(&config.identity);
    info!(mode = ?config.identity.mode, "Identity resolver ready");

    let app = hc_platform::build_app(pool.clone(), resolver, &config.http);

    let addr = config.http.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("API server listening on http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Holacracy Platform Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
