//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! startup:
//!     LogSettings → logging.rs (BaseLogger: filter + formatter + sink)
//!
//! per request:
//!     hooks.rs on_request  → context.rs (RequestContext + ScopedLogger)
//!     handler              → ctx.logger().info(..)
//!     hooks.rs on_response | on_error (unhandled.rs)
//!
//! sink:
//!     non-blocking writer → stdout (JSON or pretty)
//! ```
//!
//! # Design Decisions
//! - Correlation ID flows through every entry of a request
//! - The base logger is passed as a handle, never mutated per request
//! - Log writes are queued, never awaited on the request path

pub mod context;
pub mod hooks;
pub mod logging;
pub mod unhandled;

pub use context::{RequestContext, RequestFields, ScopedLogger};
pub use hooks::request_logging;
pub use logging::{BaseLogger, LogFormat, LogLevel, LogSettings, LoggingError};
pub use unhandled::UnhandledError;
