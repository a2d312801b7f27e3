//! myapp: a minimal web backend with request audit logging.
//!
//! This is the application entry point. It parses command line arguments,
//! loads configuration from a TOML file, initializes tracing, connects the
//! database pool and creates the schema, then serves the Axum router.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myapp::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use myapp::db;
use myapp::error::AppError;
use myapp::routes::create_router;
use myapp::state::AppState;

/// myapp: a welcome and health-check backend with request audit logging
#[derive(Parser, Debug)]
#[command(name = "myapp", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "myapp=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (needed before tracing init for the log format)
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with filter priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(database = config.database.label(), "Loaded configuration");

    // Connect the pool and create the audit tables if absent
    let pool = db::connect(&config.database).await?;
    tracing::info!(url = %config.database.url, "Database ready");

    // Create application state and router
    let state = AppState::new(config.clone(), pool);
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .expect("Invalid http.host or http.port in config");
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
