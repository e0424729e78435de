//! HTTP collaborator boundary and the default reqwest-backed implementation
//! used to fetch auxiliary scripts.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
        }
    }
}

/// Typed transfer failure. Transport-level failures (no response at all)
/// carry status 0 and the transport error text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("http {status}: {status_text}")]
pub struct HttpError {
    pub status: u16,
    pub status_text: String,
}

impl HttpError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            status_text: message.into(),
        }
    }
}

#[async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<String, HttpError>;
}

/// Default `HttpSend` over a shared reqwest client.
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestSender {
    async fn send(&self, request: HttpRequest) -> Result<String, HttpError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        response.text().await.map_err(|e| HttpError {
            status: status.as_u16(),
            status_text: e.to_string(),
        })
    }
}
