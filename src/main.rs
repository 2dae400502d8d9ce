//! User Service
//!
//! A small user CRUD API built with Tokio and Axum, instrumented with
//! per-request correlation IDs and structured logging.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                   USER SERVICE                    │
//!                       │                                                  │
//!    Client Request     │  ┌──────────────┐   ┌─────────────┐              │
//!    ───────────────────┼─▶│ request_     │──▶│ catch-panic │              │
//!                       │  │ logging      │   │ body limit  │              │
//!                       │  │ (start hook) │   │ timeout     │              │
//!                       │  └──────┬───────┘   └──────┬──────┘              │
//!                       │         │                  ▼                     │
//!                       │         │           ┌─────────────┐  ┌─────────┐ │
//!                       │         │           │  handlers   │─▶│  users  │ │
//!                       │         │           │ (scoped log)│  │ in-mem  │ │
//!                       │         ▼           └──────┬──────┘  └─────────┘ │
//!    Client Response    │  ┌──────────────┐          │                     │
//!    ◀──────────────────┼──│ end / error  │◀─────────┘                     │
//!    (X-Request-ID)     │  │ hook         │                                │
//!                       │  └──────────────┘                                │
//!                       └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use user_service::config::load_config;
use user_service::http::HttpServer;
use user_service::lifecycle::{signals, Shutdown};
use user_service::observability::BaseLogger;
use user_service::users::InMemoryUserRepository;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User CRUD API with request correlation logging", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let settings = config.log_settings();

    let (logger, _log_guard) = BaseLogger::stdout(settings);
    logger.install_global()?;

    tracing::info!(
        environment = %config.environment,
        log_level = %settings.level,
        log_format = ?settings.format,
        "HTTP server initialized"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let repository = Arc::new(InMemoryUserRepository::new());
    let server = HttpServer::new(config, logger, repository);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
