//! Provider drivers: one per wire protocol.
//!
//! Each driver turns a [`GenerationRequest`] into its backend's HTTP request,
//! reads the reply back into raw text and hands that text to the normalizer.
//! The dispatcher holds them as `Arc<dyn ProviderDriver>` keyed by [`Route`].

pub mod gemini;
pub mod openai;
pub mod relay;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::normalize::normalize;
use crate::transport::{HttpReply, HttpTransport};
use crate::types::{GenerationRequest, GenerationResult, ProviderSelection, Route};
use crate::{Error, Result};

pub use gemini::GeminiDriver;
pub use openai::{CompatEndpoints, OpenAiCompatDriver};
pub use relay::RelayDriver;

/// Sampling temperature used by every generation request.
pub const TEMPERATURE: f64 = 0.7;

/// Provider-specific HTTP request, ready to send.
#[derive(Clone)]
pub struct DriverRequest {
    pub url: String,
    /// Sent as `Authorization: Bearer`.
    pub bearer: Option<String>,
    /// URL query parameters (the native provider carries its key here).
    pub query: Vec<(String, String)>,
    pub body: Value,
}

impl fmt::Debug for DriverRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRequest")
            .field("url", &self.url)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field(
                "query",
                &self.query.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            )
            .field("body", &self.body)
            .finish()
    }
}

impl DriverRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            bearer: None,
            query: Vec::new(),
            body,
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub(crate) async fn send(&self, transport: &HttpTransport) -> Result<HttpReply> {
        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        transport
            .post_json(&self.url, self.bearer.as_deref(), &query, &self.body)
            .await
    }
}

/// Core trait for provider-specific adaptation.
///
/// `build_request` and `extract_text` are pure so they can be tested without
/// a network; `generate` ties them together with a single HTTP attempt.
#[async_trait]
pub trait ProviderDriver: Send + Sync + fmt::Debug {
    /// Route this driver serves.
    fn route(&self) -> Route;

    fn transport(&self) -> &HttpTransport;

    /// Build the wire request. Fails with `CredentialMissing` before any I/O.
    fn build_request(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> Result<DriverRequest>;

    /// Pull the generated text out of a reply, or reject it.
    fn extract_text(&self, reply: &HttpReply) -> Result<String>;

    /// Hook for drivers that explain network failures to the user.
    fn map_transport_error(&self, _url: &str, err: Error) -> Error {
        err
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> Result<GenerationResult> {
        let wire = self.build_request(request, selection)?;
        let reply = wire
            .send(self.transport())
            .await
            .map_err(|e| match e {
                Error::Transport(_) => self.map_transport_error(&wire.url, e),
                other => other,
            })?;
        let text = self.extract_text(&reply)?;
        Ok(normalize(&text))
    }

    /// Liveness check. Errors are turned into `false` by the prober.
    async fn probe(&self, selection: &ProviderSelection) -> Result<bool>;
}

/// Rejection carrying the upstream `error.message`, else `fallback`.
pub(crate) fn rejection(provider: &str, reply: &HttpReply, fallback: String) -> Error {
    let message = reply.error_message().unwrap_or(fallback);
    tracing::warn!(provider, status = reply.status, %message, "provider rejected request");
    Error::rejected(provider, Some(reply.status), message)
}

/// Char-boundary safe truncation for echoing upstream bodies.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
