//! User service library: user CRUD over HTTP behind a request
//! observability pipeline (correlation IDs, request-scoped logging,
//! request/response/error telemetry).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod users;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{BaseLogger, RequestContext};
