use std::collections::HashMap;
use std::sync::Arc;

use crate::client::core::Dispatcher;
use crate::drivers::relay::DEFAULT_RELAY_TOKEN;
use crate::drivers::{CompatEndpoints, GeminiDriver, OpenAiCompatDriver, ProviderDriver, RelayDriver};
use crate::transport::{HttpTransport, TransportConfig};
use crate::types::{ProviderId, Route};
use crate::Result;

/// Builder for creating dispatchers with custom configuration.
///
/// Endpoint overrides exist primarily for testing against mock servers.
pub struct DispatcherBuilder {
    transport: TransportConfig,
    gemini_base_url: Option<String>,
    compat_endpoints: HashMap<ProviderId, CompatEndpoints>,
    platform_credential: Option<String>,
    relay_token: String,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            transport: TransportConfig::default(),
            gemini_base_url: None,
            compat_endpoints: HashMap::new(),
            platform_credential: None,
            relay_token: DEFAULT_RELAY_TOKEN.to_string(),
        }
    }

    /// Transport settings from `PROMPT_FORGE_*` variables and the platform
    /// credential from the keyring or environment.
    pub fn from_env() -> Self {
        Self::new()
            .transport(TransportConfig::from_env())
            .platform_credential(crate::config::platform_credential())
    }

    pub fn transport(mut self, config: TransportConfig) -> Self {
        self.transport = config;
        self
    }

    /// Fallback key for the native provider when a selection has none.
    pub fn platform_credential(mut self, credential: Option<String>) -> Self {
        self.platform_credential = credential;
        self
    }

    /// Bearer token understood by the relay operator's access policy.
    pub fn relay_token(mut self, token: impl Into<String>) -> Self {
        self.relay_token = token.into();
        self
    }

    /// Override the Gemini API base URL.
    pub fn gemini_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(base_url.into());
        self
    }

    /// Override the endpoints of one compatible provider.
    pub fn compat_endpoints(mut self, provider: ProviderId, endpoints: CompatEndpoints) -> Self {
        self.compat_endpoints.insert(provider, endpoints);
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        let transport = Arc::new(HttpTransport::new(&self.transport)?);
        let mut drivers: HashMap<Route, Arc<dyn ProviderDriver>> = HashMap::new();

        let mut gemini = GeminiDriver::new(transport.clone())
            .with_platform_credential(self.platform_credential);
        if let Some(base) = self.gemini_base_url {
            gemini = gemini.with_base_url(base);
        }
        drivers.insert(Route::Native, Arc::new(gemini));

        for provider in ProviderId::COMPAT {
            let mut driver = OpenAiCompatDriver::new(provider, transport.clone());
            if let Some(endpoints) = self.compat_endpoints.get(&provider) {
                driver = driver.with_endpoints(endpoints.clone());
            }
            drivers.insert(Route::Compat(provider), Arc::new(driver));
        }

        drivers.insert(
            Route::Relay,
            Arc::new(RelayDriver::new(transport).with_token(self.relay_token)),
        );

        Ok(Dispatcher { drivers })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
