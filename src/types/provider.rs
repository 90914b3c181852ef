//! Provider identities and dispatch routes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

/// One backend identity.
///
/// `Gemini` is the native structured-output backend; the others share the
/// OpenAI chat-completions wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Groq,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Gemini,
        ProviderId::OpenAi,
        ProviderId::Groq,
        ProviderId::OpenRouter,
    ];

    /// The OpenAI-compatible family.
    pub const COMPAT: [ProviderId; 3] =
        [ProviderId::OpenAi, ProviderId::Groq, ProviderId::OpenRouter];

    pub fn id(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenAi => "openai",
            ProviderId::Groq => "groq",
            ProviderId::OpenRouter => "openrouter",
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, ProviderId::Gemini)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderId::Gemini),
            "openai" => Ok(ProviderId::OpenAi),
            "groq" => Ok(ProviderId::Groq),
            "openrouter" => Ok(ProviderId::OpenRouter),
            other => Err(Error::configuration_with_context(
                format!("unknown provider '{}'", other),
                ErrorContext::new()
                    .with_field_path("provider")
                    .with_details("expected one of: gemini, openai, groq, openrouter"),
            )),
        }
    }
}

/// Which driver a call goes through.
///
/// The relay is a route of the native provider, not a provider of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Native,
    Compat(ProviderId),
    Relay,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Native => f.write_str("native"),
            Route::Compat(p) => write!(f, "compat:{}", p),
            Route::Relay => f.write_str("relay"),
        }
    }
}
