//! Relay driver: forwards one combined prompt to a user-operated endpoint.
//!
//! The relay holds the real upstream key itself. This side only sends a fixed
//! bearer token that the relay's own access policy understands. The reply
//! shape is not fixed, so the text is looked up through an ordered list of
//! candidate fields.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use url::Url;

use crate::transport::{HttpReply, HttpTransport, TransportError};
use crate::types::{GenerationRequest, ProviderSelection, Route};
use crate::{Error, Result};

use super::{truncate, DriverRequest, ProviderDriver};

/// Token sent when the dispatcher is not given one.
pub const DEFAULT_RELAY_TOKEN: &str = "prompt-forge-relay";

/// Where to find the generated text in a relay reply, highest priority first.
pub const TEXT_POINTERS: [&str; 5] = [
    "/candidates/0/content/parts/0/text",
    "/candidates/0/text",
    "/text",
    "/response",
    "/output",
];

const PROVIDER: &str = "relay";
const BODY_ECHO_CHARS: usize = 200;
const CORS_HINT: &str = "the relay may be offline, or its CORS headers may be misconfigured \
     (it must allow this origin and the Content-Type and Authorization headers)";

/// Trim and drop everything from the first `?`.
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.find('?') {
        Some(idx) => trimmed[..idx].to_string(),
        None => trimmed.to_string(),
    }
}

/// The relay takes one string, so instruction and input travel together.
pub fn combine_prompt(request: &GenerationRequest) -> String {
    format!(
        "[SYSTEM INSTRUCTION]\n{}\n\n[USER INPUT]\n{}\n\nIMPORTANT: Respond ONLY with a valid JSON array of strings. No markdown formatting.",
        request.system_instruction, request.user_prompt
    )
}

/// First non-blank string found at [`TEXT_POINTERS`].
pub fn extract_relay_text(body: &Value) -> Option<&str> {
    TEXT_POINTERS.iter().find_map(|pointer| {
        body.pointer(pointer)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    })
}

#[derive(Debug)]
pub struct RelayDriver {
    transport: Arc<HttpTransport>,
    token: String,
}

impl RelayDriver {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self {
            transport,
            token: DEFAULT_RELAY_TOKEN.to_string(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    fn target(selection: &ProviderSelection) -> Result<String> {
        let raw = selection.relay_url().ok_or_else(|| {
            Error::Transport(TransportError::Unreachable {
                url: String::new(),
                hint: "no relay URL configured".into(),
            })
        })?;
        let url = sanitize_url(raw);
        Url::parse(&url).map_err(|e| {
            Error::Transport(TransportError::Unreachable {
                url: url.clone(),
                hint: format!("relay URL is not a valid absolute URL ({})", e),
            })
        })?;
        Ok(url)
    }

    fn wire(&self, url: String, prompt: &str) -> DriverRequest {
        DriverRequest::post(url, json!({ "prompt": prompt })).bearer(self.token.clone())
    }
}

#[async_trait]
impl ProviderDriver for RelayDriver {
    fn route(&self) -> Route {
        Route::Relay
    }

    fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    fn build_request(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> Result<DriverRequest> {
        let url = Self::target(selection)?;
        Ok(self.wire(url, &combine_prompt(request)))
    }

    fn extract_text(&self, reply: &HttpReply) -> Result<String> {
        if !reply.is_success() {
            let message = format!(
                "Relay error: HTTP {}: {}",
                reply.status,
                truncate(reply.body.trim(), BODY_ECHO_CHARS)
            );
            tracing::warn!(status = reply.status, "relay rejected request");
            return Err(Error::rejected(PROVIDER, Some(reply.status), message));
        }

        reply
            .json()
            .as_ref()
            .and_then(extract_relay_text)
            .map(String::from)
            .ok_or_else(|| {
                Error::rejected(
                    PROVIDER,
                    Some(reply.status),
                    "relay returned no extractable content",
                )
            })
    }

    fn map_transport_error(&self, url: &str, err: Error) -> Error {
        match err {
            Error::Transport(TransportError::Http(e)) => {
                Error::Transport(TransportError::Unreachable {
                    url: url.to_string(),
                    hint: format!("{} ({})", CORS_HINT, e),
                })
            }
            other => other,
        }
    }

    async fn probe(&self, selection: &ProviderSelection) -> Result<bool> {
        let url = Self::target(selection)?;
        let reply = self.wire(url, "ping").send(&self.transport).await?;
        Ok(reply.is_success())
    }
}
