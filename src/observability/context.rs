//! Per-request correlation context and scoped logger.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::observability::logging::{BaseLogger, LogLevel, FATAL_TARGET};

/// Emit an event through a [`ScopedLogger`], prefixed with its request fields.
macro_rules! scoped_event {
    (target: $target:expr, $logger:expr, $level:expr, $($rest:tt)+) => {{
        let logger: &$crate::observability::ScopedLogger = &$logger;
        let fields = logger.fields();
        logger.base().in_scope(|| {
            ::tracing::event!(
                target: $target,
                $level,
                correlation_id = %fields.correlation_id,
                method = %fields.method,
                url = %fields.url,
                ip = fields.ip.as_deref(),
                user_agent = fields.user_agent.as_deref(),
                $($rest)+
            )
        })
    }};
    ($logger:expr, $level:expr, $($rest:tt)+) => {{
        let logger: &$crate::observability::ScopedLogger = &$logger;
        let fields = logger.fields();
        logger.base().in_scope(|| {
            ::tracing::event!(
                $level,
                correlation_id = %fields.correlation_id,
                method = %fields.method,
                url = %fields.url,
                ip = fields.ip.as_deref(),
                user_agent = fields.user_agent.as_deref(),
                $($rest)+
            )
        })
    }};
}

pub(crate) use scoped_event;

/// Fields attached to every entry of a request's logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFields {
    pub correlation_id: String,
    pub method: String,
    pub url: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// A child of the base logger bound to one request.
///
/// Shares the base logger's level and sink; the request fields are fixed at
/// construction and appear on every entry.
#[derive(Debug, Clone)]
pub struct ScopedLogger {
    base: BaseLogger,
    fields: Arc<RequestFields>,
}

impl ScopedLogger {
    pub fn new(base: &BaseLogger, fields: RequestFields) -> Self {
        Self {
            base: base.clone(),
            fields: Arc::new(fields),
        }
    }

    pub fn fields(&self) -> &RequestFields {
        &self.fields
    }

    pub fn base(&self) -> &BaseLogger {
        &self.base
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => scoped_event!(self, tracing::Level::TRACE, "{}", message),
            LogLevel::Debug => scoped_event!(self, tracing::Level::DEBUG, "{}", message),
            LogLevel::Info => scoped_event!(self, tracing::Level::INFO, "{}", message),
            LogLevel::Warn => scoped_event!(self, tracing::Level::WARN, "{}", message),
            LogLevel::Error => scoped_event!(self, tracing::Level::ERROR, "{}", message),
            LogLevel::Fatal => {
                scoped_event!(target: FATAL_TARGET, self, tracing::Level::ERROR, fatal = true, "{}", message)
            }
        }
    }

    pub fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn fatal(&self, message: &str) {
        self.log(LogLevel::Fatal, message);
    }
}

/// Correlation context of one in-flight request.
///
/// Created by the request-start hook and placed in the request extensions;
/// handlers take it as an extractor.
#[derive(Debug, Clone)]
pub struct RequestContext {
    started_at: Instant,
    logger: ScopedLogger,
}

impl RequestContext {
    pub fn new(base: &BaseLogger, fields: RequestFields) -> Self {
        Self {
            started_at: Instant::now(),
            logger: ScopedLogger::new(base, fields),
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.logger.fields().correlation_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn logger(&self) -> &ScopedLogger {
        &self.logger
    }

    /// Time since the request-start hook ran. Monotonic, never negative.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "request context missing"))
    }
}

/// Render a duration in milliseconds with microsecond precision, e.g. `1.234ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0)
}
