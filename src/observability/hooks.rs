//! Request lifecycle hooks.
//!
//! ```text
//! request ─▶ on_request ─▶ handler ─┬─▶ on_response  (response finalized)
//!                                   └─▶ on_error     (UnhandledError attached)
//! ```
//!
//! Exactly one terminal hook fires per completed request. A request dropped
//! mid-flight (client gone) only has its "incoming request" entry.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::http::request::{request_fields, resolve_correlation_id, X_REQUEST_ID};
use crate::observability::context::{format_elapsed, scoped_event, RequestContext};
use crate::observability::logging::BaseLogger;
use crate::observability::unhandled::UnhandledError;

/// Request-start hook: build the correlation context and log the request.
pub fn on_request<B>(base: &BaseLogger, request: &Request<B>) -> RequestContext {
    let correlation_id = resolve_correlation_id(request.headers());
    let ctx = RequestContext::new(base, request_fields(request, correlation_id));

    scoped_event!(ctx.logger(), tracing::Level::INFO, "incoming request");
    ctx
}

/// Request-end hook.
pub fn on_response(ctx: &RequestContext, status: StatusCode) {
    let elapsed = format_elapsed(ctx.elapsed());
    scoped_event!(
        ctx.logger(),
        tracing::Level::INFO,
        status_code = status.as_u16(),
        response_time = %elapsed,
        "response sent"
    );
}

/// Error hook. Observes only; the response is already built.
pub fn on_error(ctx: &RequestContext, error: &UnhandledError) {
    let backtrace = if ctx.logger().base().settings().backtraces {
        error.backtrace.as_deref()
    } else {
        None
    };
    scoped_event!(
        ctx.logger(),
        tracing::Level::ERROR,
        error.name = %error.name,
        error.message = %error.message,
        error.backtrace = backtrace,
        "unhandled error"
    );
}

/// Middleware running the hooks around the rest of the stack.
///
/// Sits outermost so the `X-Request-ID` header lands on every response,
/// including ones produced by inner layers (timeouts, panics).
pub async fn request_logging(
    State(base): State<BaseLogger>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let ctx = on_request(&base, &request);
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(ctx.correlation_id()) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    match response.extensions().get::<UnhandledError>() {
        Some(error) => on_error(&ctx, error),
        None => on_response(&ctx, response.status()),
    }

    response
}
