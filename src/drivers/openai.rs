//! OpenAI-compatible chat-completions driver.
//!
//! Works for OpenAI, Groq and OpenRouter; they differ only in endpoint and
//! credential slot.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::transport::{HttpReply, HttpTransport};
use crate::types::{GenerationRequest, ProviderId, ProviderSelection, Route};
use crate::{Error, Result};

use super::{rejection, DriverRequest, ProviderDriver, TEMPERATURE};

/// Appended to the system message; these backends have no schema enforcement.
pub const JSON_ARRAY_SUFFIX: &str = " Respond only with a JSON array of strings.";

/// Chat and liveness endpoints of one compatible backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatEndpoints {
    pub chat: String,
    /// GET target for the probe: model listing or key introspection.
    pub probe: String,
}

impl CompatEndpoints {
    pub fn for_provider(provider: ProviderId) -> Self {
        match provider {
            ProviderId::OpenAi | ProviderId::Gemini => Self::with_base("https://api.openai.com/v1"),
            ProviderId::Groq => Self::with_base("https://api.groq.com/openai/v1"),
            ProviderId::OpenRouter => Self {
                chat: "https://openrouter.ai/api/v1/chat/completions".into(),
                probe: "https://openrouter.ai/api/v1/auth/key".into(),
            },
        }
    }

    /// `{base}/chat/completions` and `{base}/models`.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            chat: format!("{}/chat/completions", base),
            probe: format!("{}/models", base),
        }
    }
}

/// Chat-completions driver bound to one provider of the compatible family.
#[derive(Debug)]
pub struct OpenAiCompatDriver {
    provider: ProviderId,
    transport: Arc<HttpTransport>,
    endpoints: CompatEndpoints,
}

impl OpenAiCompatDriver {
    pub fn new(provider: ProviderId, transport: Arc<HttpTransport>) -> Self {
        Self {
            provider,
            transport,
            endpoints: CompatEndpoints::for_provider(provider),
        }
    }

    pub fn with_endpoints(mut self, endpoints: CompatEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &CompatEndpoints {
        &self.endpoints
    }

    fn credential<'a>(&self, selection: &'a ProviderSelection) -> Result<&'a str> {
        selection.credential().ok_or_else(|| {
            Error::credential_missing(
                self.provider.id(),
                format!("API key for {} not found.", self.provider.id().to_uppercase()),
            )
        })
    }
}

#[async_trait]
impl ProviderDriver for OpenAiCompatDriver {
    fn route(&self) -> Route {
        Route::Compat(self.provider)
    }

    fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    fn build_request(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> Result<DriverRequest> {
        let key = self.credential(selection)?;

        let body = json!({
            "model": selection.model,
            "messages": [
                {
                    "role": "system",
                    "content": format!("{}{}", request.system_instruction, JSON_ARRAY_SUFFIX)
                },
                { "role": "user", "content": request.user_prompt }
            ],
            "temperature": TEMPERATURE,
        });

        Ok(DriverRequest::post(self.endpoints.chat.clone(), body).bearer(key))
    }

    fn extract_text(&self, reply: &HttpReply) -> Result<String> {
        if !reply.is_success() {
            return Err(rejection(
                self.provider.id(),
                reply,
                format!("Provider handshake failed: HTTP {}", reply.status),
            ));
        }

        reply
            .json()
            .and_then(|body| {
                body.pointer("/choices/0/message/content")
                    .and_then(|v| v.as_str())
                    .map(String::from)
            })
            .ok_or_else(|| {
                Error::rejected(
                    self.provider.id(),
                    Some(reply.status),
                    format!("{} returned no message content", self.provider.id()),
                )
            })
    }

    async fn probe(&self, selection: &ProviderSelection) -> Result<bool> {
        let key = self.credential(selection)?;
        let reply = self.transport.get(&self.endpoints.probe, Some(key)).await?;
        Ok(reply.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Operation;
    use crate::transport::TransportConfig;

    fn driver(provider: ProviderId) -> OpenAiCompatDriver {
        let transport = Arc::new(HttpTransport::new(&TransportConfig::default()).unwrap());
        OpenAiCompatDriver::new(provider, transport)
    }

    #[test]
    fn test_openai_driver_build_request() {
        let d = driver(ProviderId::OpenAi);
        let sel = ProviderSelection::new(ProviderId::OpenAi, "gpt-4o-mini").with_credential("sk-test");
        let req = d
            .build_request(
                &GenerationRequest::new(Operation::Improve, "Coach me.", "Improve: hi"),
                &sel,
            )
            .unwrap();

        assert_eq!(req.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(req.bearer.as_deref(), Some("sk-test"));
        assert!(req.query.is_empty());
        assert_eq!(req.body["model"], "gpt-4o-mini");
        assert_eq!(req.body["temperature"], 0.7);
        assert_eq!(req.body["messages"][0]["role"], "system");
        assert_eq!(
            req.body["messages"][0]["content"],
            "Coach me. Respond only with a JSON array of strings."
        );
        assert_eq!(req.body["messages"][1]["role"], "user");
        assert_eq!(req.body["messages"][1]["content"], "Improve: hi");
    }

    #[test]
    fn test_endpoints_per_provider() {
        assert_eq!(
            CompatEndpoints::for_provider(ProviderId::Groq).chat,
            "https://api.groq.com/openai/v1/chat/completions"
        );
        assert_eq!(
            CompatEndpoints::for_provider(ProviderId::Groq).probe,
            "https://api.groq.com/openai/v1/models"
        );
        assert_eq!(
            CompatEndpoints::for_provider(ProviderId::OpenRouter).probe,
            "https://openrouter.ai/api/v1/auth/key"
        );
        assert_eq!(
            CompatEndpoints::for_provider(ProviderId::OpenAi).probe,
            "https://api.openai.com/v1/models"
        );
    }

    #[test]
    fn test_missing_key_names_provider() {
        let d = driver(ProviderId::OpenRouter);
        let sel = ProviderSelection::new(ProviderId::OpenRouter, "m");
        let err = d
            .build_request(&GenerationRequest::new(Operation::Expand, "s", "u"), &sel)
            .unwrap_err();
        assert!(err.is_credential_missing());
        assert_eq!(err.to_string(), "API key for OPENROUTER not found.");
    }

    #[test]
    fn test_openai_driver_parse_response() {
        let d = driver(ProviderId::OpenAi);
        let reply = HttpReply {
            status: 200,
            body: r#"{"choices":[{"message":{"content":"[\"x\"]"},"finish_reason":"stop"}]}"#.into(),
        };
        assert_eq!(d.extract_text(&reply).unwrap(), r#"["x"]"#);
    }

    #[test]
    fn test_rejection_messages() {
        let d = driver(ProviderId::Groq);
        let reply = HttpReply {
            status: 401,
            body: r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#.into(),
        };
        assert_eq!(d.extract_text(&reply).unwrap_err().to_string(), "Invalid API Key");

        let reply = HttpReply {
            status: 500,
            body: "upstream exploded".into(),
        };
        assert_eq!(
            d.extract_text(&reply).unwrap_err().to_string(),
            "Provider handshake failed: HTTP 500"
        );
    }

    #[test]
    fn test_success_without_content_is_rejected() {
        let d = driver(ProviderId::OpenAi);
        let reply = HttpReply {
            status: 200,
            body: r#"{"choices":[]}"#.into(),
        };
        assert!(d.extract_text(&reply).unwrap_err().is_rejected());
    }
}
