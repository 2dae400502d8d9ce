//! Failures that escaped handler code.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};

/// An error no handler turned into a regular response.
///
/// Whoever builds the 500 response attaches this as a response extension;
/// the error hook picks it up from there.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {message}")]
pub struct UnhandledError {
    pub name: String,
    pub message: String,
    pub backtrace: Option<String>,
}

impl UnhandledError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            backtrace: None,
        }
    }

    /// Capture an error value along with a backtrace of the current thread.
    ///
    /// Backtraces are only captured when `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`
    /// enable them.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error,
    {
        let backtrace = Backtrace::capture();
        Self {
            name: std::any::type_name::<E>().to_string(),
            message: error.to_string(),
            backtrace: match backtrace.status() {
                BacktraceStatus::Captured => Some(backtrace.to_string()),
                _ => None,
            },
        }
    }

    /// Build from a panic payload caught by the dispatcher.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::new("panic", message)
    }
}
