//! Settings document and configuration snapshots.
//!
//! The dispatcher never reads settings on its own. Callers take a snapshot
//! through [`ConfigurationProvider`] and pass the resulting
//! [`ProviderSelection`] into each call.

mod credentials;

pub use credentials::platform_credential;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::catalog::Operation;
use crate::types::{ProviderId, ProviderSelection};
use crate::{Error, ErrorContext, Result};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Per-provider credential slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter: Option<String>,
}

impl ApiKeys {
    pub fn get(&self, provider: ProviderId) -> Option<&str> {
        let slot = match provider {
            ProviderId::Gemini => &self.gemini,
            ProviderId::OpenAi => &self.openai,
            ProviderId::Groq => &self.groq,
            ProviderId::OpenRouter => &self.openrouter,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn set(&mut self, provider: ProviderId, key: impl Into<String>) {
        let slot = match provider {
            ProviderId::Gemini => &mut self.gemini,
            ProviderId::OpenAi => &mut self.openai,
            ProviderId::Groq => &mut self.groq,
            ProviderId::OpenRouter => &mut self.openrouter,
        };
        *slot = Some(key.into());
    }
}

/// User settings, in the same camelCase shape the settings store persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_provider")]
    pub provider: ProviderId,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_keys: ApiKeys,
    #[serde(default)]
    pub use_proxy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default, deserialize_with = "known_operations_only")]
    pub custom_instructions: BTreeMap<Operation, String>,
}

/// Override keys that name no operation are dropped rather than failing the
/// whole document; the store may hold keys from older releases.
fn known_operations_only<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<Operation, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Option<String>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, text)| match key.parse::<Operation>() {
            Ok(op) => text.map(|t| (op, t)),
            Err(_) => {
                warn!(key = %key, "ignoring custom instruction for unknown operation");
                None
            }
        })
        .collect())
}

fn default_provider() -> ProviderId {
    ProviderId::Gemini
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_keys: ApiKeys::default(),
            use_proxy: false,
            proxy_url: None,
            custom_instructions: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid settings: {}", e),
                ErrorContext::new()
                    .with_details(format!("line {}, column {}", e.line(), e.column()))
                    .with_source("settings_loader"),
            )
        })
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid settings: {}", e),
                ErrorContext::new().with_source("settings_loader"),
            )
        })
    }

    /// Load a settings file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read settings: {}", e),
                ErrorContext::new()
                    .with_field_path(path.display().to_string())
                    .with_source("settings_loader"),
            )
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw),
            _ => Self::from_json_str(&raw),
        }
    }

    /// Instruction for `operation`: the non-blank override, else the built-in default.
    pub fn instruction_for(&self, operation: Operation) -> String {
        self.custom_instructions
            .get(&operation)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| operation.default_instruction())
            .to_string()
    }

    /// Snapshot for the active provider.
    pub fn selection(&self) -> ProviderSelection {
        self.selection_for(self.provider)
    }

    /// Snapshot for any provider's credential slot, sharing model and relay settings.
    pub fn selection_for(&self, provider: ProviderId) -> ProviderSelection {
        ProviderSelection {
            provider,
            model: self.model.clone(),
            credential: self.api_keys.get(provider).map(String::from),
            relay_url: self.proxy_url.clone(),
            relay_enabled: self.use_proxy,
        }
    }
}

/// Source of settings snapshots.
///
/// Every call reads exactly one snapshot; mutation after that point does not
/// reach the in-flight call.
pub trait ConfigurationProvider: Send + Sync {
    fn settings(&self) -> Settings;
}

impl ConfigurationProvider for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

impl ConfigurationProvider for RwLock<Settings> {
    fn settings(&self) -> Settings {
        match self.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl<T: ConfigurationProvider + ?Sized> ConfigurationProvider for Arc<T> {
    fn settings(&self) -> Settings {
        (**self).settings()
    }
}
