//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

use user_service::config::ServiceConfig;
use user_service::http::HttpServer;
use user_service::observability::{BaseLogger, LogLevel, LogSettings};
use user_service::users::{InMemoryUserRepository, UserRepository};

/// In-memory log sink; every formatted entry is one JSON line.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn entries(&self) -> Vec<Value> {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line is not JSON"))
            .collect()
    }

    /// Entries belonging to one correlation ID, in emission order.
    pub fn for_request(&self, correlation_id: &str) -> Vec<Value> {
        self.entries()
            .into_iter()
            .filter(|e| e["correlation_id"] == correlation_id)
            .collect()
    }

    pub fn messages_for(&self, correlation_id: &str) -> Vec<String> {
        self.for_request(correlation_id)
            .iter()
            .map(|e| e["message"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn capture_logger(level: LogLevel) -> (BaseLogger, CapturedLogs) {
    let logs = CapturedLogs::default();
    let settings = LogSettings {
        level,
        ..LogSettings::default()
    };
    (BaseLogger::new(settings, logs.clone()), logs)
}

/// The service router over a fresh in-memory store, logging into memory.
pub fn test_app(level: LogLevel) -> (Router, CapturedLogs) {
    test_app_with(level, Arc::new(InMemoryUserRepository::new()))
}

pub fn test_app_with(level: LogLevel, repository: Arc<dyn UserRepository>) -> (Router, CapturedLogs) {
    let (logger, logs) = capture_logger(level);
    let server = HttpServer::new(ServiceConfig::default(), logger, repository);
    (server.router(), logs)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    let body = body.to_string();
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn request_id(response: &Response) -> String {
    response
        .headers()
        .get("x-request-id")
        .expect("X-Request-ID missing")
        .to_str()
        .unwrap()
        .to_string()
}
