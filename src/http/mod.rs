//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → observability hooks (correlation ID, request logging)
//!     → request.rs (ID resolution, client IP, log fields)
//!     → handlers.rs / users::handlers
//!     → response.rs (error mapping, panic responses)
//!     → Send to client (X-Request-ID echoed)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientIp, JsonBody, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{apply_middleware, AppState, HttpServer};
