//! MEGA Backend - rental management REST API
//!
//! The listener binds only after the store connects and every route binds.
//! Any startup failure exits non-zero.

use mega_backend::{build_app, store, AppState, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize structured logging
    init_tracing();

    let config = Config::from_env();
    log_startup_info(&config);

    let store = match store::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to connect to the database");
            std::process::exit(1);
        }
    };

    let state = AppState::new(store, config.clone());
    let app = match build_app(state) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to bind routes");
            std::process::exit(1);
        }
    };

    serve(app, &config).await;
}

/// Initialize tracing with environment-based log levels.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mega_backend=debug,tower_http=info")),
        )
        .init();
}

/// Log startup configuration (no secrets).
fn log_startup_info(config: &Config) {
    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        environment = config.environment.as_str(),
        storage = if config.in_memory() { "memory" } else { "postgres" },
        db_host = %config.database.host,
        db_port = config.database.port,
        jwt_configured = config.jwt_secret.is_some(),
        "Starting MEGA backend"
    );
}

/// Bind to address and serve the application.
async fn serve(app: axum::Router, config: &Config) {
    let bind_addr = format!("{}:{}", config.bind_addr, config.port);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %bind_addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };

    info!(addr = %bind_addr, "Server listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
