//! Mock HTTP backend shared by the integration tests.

#![allow(dead_code)]

use mockito::{Mock, Server, ServerGuard};
use prompt_forge::drivers::CompatEndpoints;
use prompt_forge::{Dispatcher, ProviderId};

pub const RELAY_TOKEN: &str = "test-relay-token";
pub const GEMINI_MODEL: &str = "gemini-test";

/// One mock server standing in for every backend, each under its own path prefix.
pub struct MockBackend {
    pub server: ServerGuard,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn gemini_path(model: &str) -> String {
        format!("/v1beta/models/{}:generateContent", model)
    }

    pub fn chat_path(provider: ProviderId) -> &'static str {
        match provider {
            ProviderId::OpenAi => "/openai/v1/chat/completions",
            ProviderId::Groq => "/groq/openai/v1/chat/completions",
            ProviderId::OpenRouter => "/openrouter/api/v1/chat/completions",
            ProviderId::Gemini => unreachable!("gemini has no chat endpoint"),
        }
    }

    pub fn probe_path(provider: ProviderId) -> &'static str {
        match provider {
            ProviderId::OpenAi => "/openai/v1/models",
            ProviderId::Groq => "/groq/openai/v1/models",
            ProviderId::OpenRouter => "/openrouter/api/v1/auth/key",
            ProviderId::Gemini => unreachable!("gemini has no metadata endpoint"),
        }
    }

    /// Dispatcher with every route pointed at this server.
    pub fn dispatcher(&self) -> Dispatcher {
        let base = self.url();
        Dispatcher::builder()
            .gemini_base_url(&base)
            .compat_endpoints(
                ProviderId::OpenAi,
                CompatEndpoints::with_base(&format!("{}/openai/v1", base)),
            )
            .compat_endpoints(
                ProviderId::Groq,
                CompatEndpoints::with_base(&format!("{}/groq/openai/v1", base)),
            )
            .compat_endpoints(
                ProviderId::OpenRouter,
                CompatEndpoints {
                    chat: format!("{}{}", base, Self::chat_path(ProviderId::OpenRouter)),
                    probe: format!("{}{}", base, Self::probe_path(ProviderId::OpenRouter)),
                },
            )
            .relay_token(RELAY_TOKEN)
            .build()
            .expect("dispatcher builds")
    }

    /// JSON reply on `method path` with any query string.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock(method, path)
            .match_query(mockito::Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }
}

/// Gemini-style envelope around `text`.
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Chat-completions envelope around `content`.
pub fn chat_reply(content: &str) -> String {
    serde_json::json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
