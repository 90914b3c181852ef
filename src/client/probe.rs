//! Connection probing: cheap liveness checks that never fail.

use futures::future::join_all;
use tracing::debug;

use super::core::Dispatcher;
use crate::types::{ProviderId, ProviderSelection};

impl Dispatcher {
    /// Whether the selected provider answers.
    ///
    /// Missing credentials, network failures and non-success statuses all
    /// resolve to `false`.
    pub async fn probe(&self, selection: &ProviderSelection) -> bool {
        let route = selection.route();
        let driver = match self.driver(route) {
            Ok(driver) => driver,
            Err(e) => {
                debug!(%route, error = %e, "probe skipped");
                return false;
            }
        };

        match driver.probe(selection).await {
            Ok(alive) => {
                debug!(provider = %selection.provider, %route, alive, "probe finished");
                alive
            }
            Err(e) => {
                debug!(provider = %selection.provider, %route, error = %e, "probe failed");
                false
            }
        }
    }

    /// Probe several selections concurrently; output follows input order.
    ///
    /// Overlapping bursts are not deduplicated.
    pub async fn probe_all(&self, selections: &[ProviderSelection]) -> Vec<(ProviderId, bool)> {
        join_all(selections.iter().map(|selection| async move {
            (selection.provider, self.probe(selection).await)
        }))
        .await
    }
}
