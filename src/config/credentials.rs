use keyring::Entry;
use std::env;
use tracing::debug;

const KEYRING_SERVICE: &str = "prompt-forge";

/// Platform-level fallback credential for the native provider.
///
/// Lookup order:
/// 1. OS keyring entry `prompt-forge` / `gemini`
/// 2. `GEMINI_API_KEY`
/// 3. `API_KEY`
pub fn platform_credential() -> Option<String> {
    if let Ok(entry) = Entry::new(KEYRING_SERVICE, "gemini") {
        if let Ok(key) = entry.get_password() {
            if !key.trim().is_empty() {
                debug!("platform credential found in keyring");
                return Some(key.trim().to_string());
            }
        }
    }

    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
}
