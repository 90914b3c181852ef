//! Gemini generateContent driver (the native, schema-capable provider).
//!
//! Key differences from the chat-completions family:
//! - System text goes in `system_instruction`, user text in `contents[].parts[]`.
//! - `generationConfig` carries temperature and the structured-output schema,
//!   so the backend itself enforces an array-of-strings reply.
//! - Response: `candidates[0].content.parts[0].text`.
//! - API key is passed as `?key=` query parameter, not in headers.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::transport::{HttpReply, HttpTransport};
use crate::types::{GenerationRequest, ProviderSelection, Route};
use crate::{Error, Result};

use super::{rejection, DriverRequest, ProviderDriver, TEMPERATURE};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const PROVIDER: &str = "gemini";

/// Google Gemini generateContent driver.
#[derive(Debug)]
pub struct GeminiDriver {
    transport: Arc<HttpTransport>,
    base_url: String,
    /// Used when the selection carries no key of its own.
    platform_credential: Option<String>,
}

impl GeminiDriver {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            platform_credential: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_platform_credential(mut self, credential: Option<String>) -> Self {
        self.platform_credential = credential.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Per-provider key first, then the platform fallback.
    fn resolve_credential(&self, selection: &ProviderSelection) -> Result<String> {
        selection
            .credential()
            .map(String::from)
            .or_else(|| self.platform_credential.clone())
            .ok_or_else(|| {
                Error::credential_missing(
                    PROVIDER,
                    "Gemini API key missing. Add one in settings or set GEMINI_API_KEY.",
                )
            })
    }

    fn response_schema() -> Value {
        json!({
            "type": "ARRAY",
            "items": { "type": "STRING" }
        })
    }

    /// Minimal request used by the liveness probe.
    pub fn build_probe_request(&self, selection: &ProviderSelection) -> Result<DriverRequest> {
        let key = self.resolve_credential(selection)?;
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": "ping" }] }],
            "generationConfig": {
                "maxOutputTokens": 5,
                "thinkingConfig": { "thinkingBudget": 0 }
            }
        });
        Ok(DriverRequest::post(self.endpoint(&selection.model), body).query("key", key))
    }

    fn candidate_text(body: &Value) -> Option<&str> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

#[async_trait]
impl ProviderDriver for GeminiDriver {
    fn route(&self) -> Route {
        Route::Native
    }

    fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    fn build_request(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> Result<DriverRequest> {
        let key = self.resolve_credential(selection)?;

        let body = json!({
            "system_instruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.user_prompt }]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "responseMimeType": "application/json",
                "response_schema": Self::response_schema()
            }
        });

        Ok(DriverRequest::post(self.endpoint(&selection.model), body).query("key", key))
    }

    fn extract_text(&self, reply: &HttpReply) -> Result<String> {
        if !reply.is_success() {
            return Err(rejection(
                PROVIDER,
                reply,
                format!("Provider request failed with HTTP {}", reply.status),
            ));
        }

        let body = reply.json().ok_or_else(|| {
            Error::rejected(PROVIDER, Some(reply.status), "gemini returned an unreadable response")
        })?;

        Self::candidate_text(&body)
            .map(String::from)
            .ok_or_else(|| Error::rejected(PROVIDER, Some(reply.status), "gemini returned no content"))
    }

    async fn probe(&self, selection: &ProviderSelection) -> Result<bool> {
        let wire = self.build_probe_request(selection)?;
        let reply = wire.send(&self.transport).await?;
        Ok(reply.is_success()
            && reply
                .json()
                .map(|body| Self::candidate_text(&body).is_some())
                .unwrap_or(false))
    }
}
