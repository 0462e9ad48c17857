// src/api/mod.rs
pub mod validate;

use std::fmt;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;

use crate::error::{BotError, Result};

pub use validate::{validate, ApiSnapshot, HomeworkRecord};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Anything that can answer "what changed since `from_date`?" with raw JSON.
#[async_trait::async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

/// HTTP client for the homework statuses endpoint.
#[derive(Clone)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
    client: Client,
    timeout: Duration,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait::async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        let transport = |source: reqwest::Error| BotError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        };

        let rsp = self
            .client
            .get(&self.endpoint)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;

        let status = rsp.status();
        if status != StatusCode::OK {
            return Err(BotError::InvalidResponseCode {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = rsp.text().await.map_err(transport)?;
        tracing::trace!(from_date, bytes = body.len(), "homework statuses fetched");

        serde_json::from_str(&body)
            .map_err(|e| BotError::Schema(format!("response body is not valid JSON: {e}")))
    }
}
