//! Service-level handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::observability::{LogLevel, RequestContext};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub correlation_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerCheck {
    pub message: &'static str,
    pub correlation_id: String,
    pub log_levels: Vec<&'static str>,
    pub timestamp: String,
}

pub async fn health(ctx: RequestContext) -> Json<HealthStatus> {
    ctx.logger().info("Health check requested");

    Json(HealthStatus {
        message: "User service",
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        correlation_id: ctx.correlation_id().to_string(),
    })
}

/// Emits info, debug and warn entries so operators can check level filtering.
pub async fn test_logger(ctx: RequestContext) -> Json<LoggerCheck> {
    let log = ctx.logger();
    log.info("Testing logger functionality");
    log.debug("Debug message with additional context");
    log.warn("Warning message example");

    Json(LoggerCheck {
        message: "Logger test completed successfully",
        correlation_id: ctx.correlation_id().to_string(),
        log_levels: LogLevel::ALL.iter().map(|l| l.as_str()).collect(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
