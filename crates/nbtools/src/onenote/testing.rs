//! In-memory transport for orchestration tests

use async_trait::async_trait;
use nbtools_core::{Error, Result};
use std::sync::Mutex;

use super::transport::{Method, Transport, TransportResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(u16, Vec<u8>),
    Unavailable,
}

/// Replays scripted replies by exact `(method, path)` and records every call.
/// Unscripted requests answer 404.
#[derive(Debug, Default)]
pub struct SpyTransport {
    routes: Vec<(Method, String, Reply)>,
    calls: Mutex<Vec<RecordedRequest>>,
}

impl SpyTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, path: &str, status: u16, body: serde_json::Value) -> Self {
        let bytes = serde_json::to_vec(&body).unwrap();
        self.on_raw(method, path, status, &bytes)
    }

    pub fn on_raw(mut self, method: Method, path: &str, status: u16, body: &[u8]) -> Self {
        self.routes
            .push((method, path.to_string(), Reply::Respond(status, body.to_vec())));
        self
    }

    pub fn unavailable(mut self, method: Method, path: &str) -> Self {
        self.routes
            .push((method, path.to_string(), Reply::Unavailable));
        self
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<TransportResponse> {
        self.calls.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let reply = self
            .routes
            .iter()
            .find(|(m, p, _)| *m == method && p == path)
            .map(|(_, _, reply)| reply.clone());

        match reply {
            Some(Reply::Respond(status, body)) => Ok(TransportResponse { status, body }),
            Some(Reply::Unavailable) => Err(Error::Unavailable(format!(
                "{method} {path} failed: connection reset"
            ))),
            None => Ok(TransportResponse {
                status: 404,
                body: br#"{"error":{"code":"20102","message":"not found"}}"#.to_vec(),
            }),
        }
    }
}
