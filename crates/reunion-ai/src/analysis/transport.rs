use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// A JSON POST issued by an analysis client.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub url: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Raw HTTP answer; the body is left undecoded so clients own the parse rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure before a complete HTTP response was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transport failure: {0}")]
    Other(String),
}

/// Outbound HTTP seam so clients can be exercised without a network.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn post_json(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Other(err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AnalysisTransport for ReqwestTransport {
    async fn post_json(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        if let Some(key) = &request.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;

        Ok(TransportResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
