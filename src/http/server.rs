//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request logging, panic capture, limits)
//! - Bind server to listener
//! - Stop once shutdown is triggered

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::{LimitsConfig, ServiceConfig};
use crate::http::handlers::{health, test_logger};
use crate::http::response::{panic_response, ApiError};
use crate::lifecycle::Shutdown;
use crate::observability::{request_logging, BaseLogger};
use crate::users::handlers::{create_user, delete_user, get_user, list_users, update_user};
use crate::users::{UserModule, UserRepository};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: UserModule,
}

/// HTTP server for the user service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    logger: BaseLogger,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, logger: BaseLogger, repository: Arc<dyn UserRepository>) -> Self {
        let state = AppState {
            users: UserModule::initialize(repository),
        };

        let router = apply_middleware(Self::build_router(state), logger.clone(), &config.limits);
        Self {
            router,
            config,
            logger,
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(health))
            .route("/test-logger", get(test_logger))
            .route("/api/users", get(list_users).post(create_user))
            .route("/api/users/{id}", get(get_user).patch(update_user).delete(delete_user))
            .fallback(not_found)
            .with_state(state)
    }

    /// The fully layered router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        self.logger.in_scope(|| {
            tracing::info!(
                address = %addr,
                pid = std::process::id(),
                "HTTP server listening"
            )
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        self.logger.in_scope(|| tracing::info!("HTTP server stopped"));
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Wrap `router` in the request pipeline, outermost first:
/// request logging, panic capture, body limit, timeout.
pub fn apply_middleware(router: Router, logger: BaseLogger, limits: &LimitsConfig) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(logger, request_logging))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(limits.request_timeout_secs),
            ))
            .layer(DefaultBodyLimit::disable()),
    )
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
