//! HTTP transport for the notebook service
//!
//! Orchestration only talks to the [`Transport`] trait, so tests can swap
//! the real client for an in-memory spy.

use async_trait::async_trait;
use nbtools_core::{Error, Result, StatusClass};

use super::config::{create_graph_client, GraphConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Status and fully drained body of one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request. `path` is relative to the service base URL.
    ///
    /// Fails with `Unavailable` on network-level failure. Non-success status
    /// codes are not errors at this level.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<TransportResponse>;

    /// Classify a status code into the error taxonomy
    fn handle_status(&self, status: u16, label: &str) -> Result<()> {
        match StatusClass::from_status(status) {
            None => Ok(()),
            Some(class) => Err(Error::Remote {
                status,
                class,
                context: label.to_string(),
            }),
        }
    }
}

/// Transport backed by `reqwest`, authenticating with a bearer token
#[derive(Debug, Clone)]
pub struct GraphTransport {
    client: reqwest::Client,
    base_url: String,
}

impl GraphTransport {
    pub fn new(config: &GraphConfig) -> color_eyre::eyre::Result<Self> {
        Ok(Self {
            client: create_graph_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for GraphTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<TransportResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        log::debug!("{method} {url}");

        let response = request
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("{method} {path} failed: {e}")))?;

        let status = response.status().as_u16();

        // Body is always drained, even for error statuses
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Unavailable(format!("reading {method} {path} response failed: {e}")))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
