//! i-Reporter App Interface mock server.
//!
//! This binary reads the configuration, sets up logging and serves the API.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ireporter_mock::{
    config::Config,
    server::{
        create_router,
        routes::{
            GET_SELECT_PATH, GET_VALUE_PATH, MASTER_FIELDS_PATH, MASTER_PARAMS_PATH,
            MASTER_RECORDS_PATH,
        },
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment and defaults still apply.
    let dotenv = dotenvy::dotenv();

    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Failed to load .env file: {}", e);
        }
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    print_banner(&config);

    let router = create_router(config.router_config());
    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server is running on http://{}", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Print the startup banner with the available endpoints.
fn print_banner(config: &Config) {
    info!("");
    info!("i-Reporter App Interface API Mock Server v{}", env!("CARGO_PKG_VERSION"));
    info!("");
    info!("Configuration:");
    info!("  Upload directory: {}", config.upload_dir.display());
    info!("  Max body size: {} bytes", config.max_body_bytes);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    if config.uses_default_token() {
        warn!("  Auth: using the built-in token '{}'", config.api_token);
        warn!("        Set API_TOKEN or --api-token to change it");
    } else {
        info!("  Auth: bearer token from configuration");
    }

    info!("");
    info!("Available endpoints:");
    info!("  GET/POST {} - 通常の値取得", GET_VALUE_PATH);
    info!("  GET      {} - 選択肢取得", GET_SELECT_PATH);
    info!("  GET      {} - フィールド取得", MASTER_FIELDS_PATH);
    info!("  GET      {} - パラメータ取得", MASTER_PARAMS_PATH);
    info!("  POST     {} - レコード取得", MASTER_RECORDS_PATH);
    info!("");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "ireporter_mock=debug,tower_http=debug"
    } else {
        "ireporter_mock=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
