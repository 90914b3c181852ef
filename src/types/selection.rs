use super::provider::{ProviderId, Route};

/// Snapshot of the provider configuration for one call.
///
/// Built once at call start and never re-read; later configuration edits do not
/// affect a call that already holds its selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSelection {
    pub provider: ProviderId,
    pub model: String,
    pub credential: Option<String>,
    pub relay_url: Option<String>,
    pub relay_enabled: bool,
}

impl ProviderSelection {
    pub fn new(provider: ProviderId, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            credential: None,
            relay_url: None,
            relay_enabled: false,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Enable the relay route with the given URL.
    pub fn with_relay(mut self, url: impl Into<String>) -> Self {
        self.relay_url = Some(url.into());
        self.relay_enabled = true;
        self
    }

    /// Credential, treating blank strings as absent.
    pub fn credential(&self) -> Option<&str> {
        self.credential
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Relay URL, treating blank strings as absent.
    pub fn relay_url(&self) -> Option<&str> {
        self.relay_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Route this selection dispatches to.
    ///
    /// Only the native provider can go through the relay; for the compat family
    /// the relay flag is ignored.
    pub fn route(&self) -> Route {
        match self.provider {
            ProviderId::Gemini if self.relay_enabled && self.relay_url().is_some() => Route::Relay,
            ProviderId::Gemini => Route::Native,
            other => Route::Compat(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_with_relay_routes_to_relay() {
        let sel = ProviderSelection::new(ProviderId::Gemini, "gemini-3-flash-preview")
            .with_relay("https://relay.example.dev/hook");
        assert_eq!(sel.route(), Route::Relay);
    }

    #[test]
    fn test_relay_flag_without_url_stays_native() {
        let mut sel = ProviderSelection::new(ProviderId::Gemini, "m").with_relay("   ");
        assert_eq!(sel.route(), Route::Native);
        sel.relay_url = None;
        assert_eq!(sel.route(), Route::Native);
    }

    #[test]
    fn test_relay_url_without_flag_stays_native() {
        let mut sel = ProviderSelection::new(ProviderId::Gemini, "m");
        sel.relay_url = Some("https://relay.example.dev".into());
        assert_eq!(sel.route(), Route::Native);
    }

    #[test]
    fn test_compat_ignores_relay() {
        let sel = ProviderSelection::new(ProviderId::Groq, "llama-3.3-70b-versatile")
            .with_relay("https://relay.example.dev/hook");
        assert_eq!(sel.route(), Route::Compat(ProviderId::Groq));
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let sel = ProviderSelection::new(ProviderId::OpenAi, "gpt-4o-mini").with_credential("  ");
        assert_eq!(sel.credential(), None);
        let sel = sel.with_credential(" sk-test ");
        assert_eq!(sel.credential(), Some("sk-test"));
    }
}
