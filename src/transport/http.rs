use crate::Result;
use reqwest::Proxy;
use serde_json::Value;
use std::env;
use std::time::Duration;
use tracing::debug;

/// Knobs for the shared HTTP client.
///
/// No request timeout is set unless asked for: a hung upstream blocks the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Option<Duration>,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy_url: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            proxy_url: None,
        }
    }
}

impl TransportConfig {
    /// Read overrides from the environment:
    /// - `PROMPT_FORGE_HTTP_TIMEOUT_SECS`
    /// - `PROMPT_FORGE_HTTP_POOL_MAX_IDLE_PER_HOST`
    /// - `PROMPT_FORGE_HTTP_POOL_IDLE_TIMEOUT_SECS`
    /// - `PROMPT_FORGE_PROXY_URL`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: env::var("PROMPT_FORGE_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            pool_max_idle_per_host: env::var("PROMPT_FORGE_HTTP_POOL_MAX_IDLE_PER_HOST")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(defaults.pool_max_idle_per_host),
            pool_idle_timeout: env::var("PROMPT_FORGE_HTTP_POOL_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool_idle_timeout),
            proxy_url: env::var("PROMPT_FORGE_PROXY_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Status and body of a completed HTTP exchange.
///
/// Non-2xx statuses are not errors at this layer; each driver decides how to read them.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, `None` if it is not JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Upstream `error.message` when the body follows the common `{ "error": { "message" } }` shape.
    pub fn error_message(&self) -> Option<String> {
        let json = self.json()?;
        json.pointer("/error/message")
            .and_then(|v| v.as_str())
            .or_else(|| json.get("error").and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

/// Shared HTTP client used by every driver.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(super::TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    /// POST a JSON body.
    ///
    /// `query` is appended as URL query parameters and never logged.
    pub async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        query: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpReply> {
        debug!(url, "POST");
        let mut request = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(key) = bearer {
            request = request.bearer_auth(key);
        }

        Self::finish(request).await
    }

    /// Authenticated GET, used for metadata endpoints.
    pub async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpReply> {
        debug!(url, "GET");
        let mut request = self.client.get(url);
        if let Some(key) = bearer {
            request = request.bearer_auth(key);
        }
        Self::finish(request).await
    }

    async fn finish(request: reqwest::RequestBuilder) -> Result<HttpReply> {
        let response = request
            .send()
            .await
            .map_err(|e| crate::Error::Transport(super::TransportError::Http(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::Error::Transport(super::TransportError::Http(e)))?;

        Ok(HttpReply { status, body })
    }
}
