use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::catalog::Operation;
use crate::config::ConfigurationProvider;
use crate::drivers::ProviderDriver;
use crate::types::{GenerationRequest, GenerationResult, ProviderSelection, Route};
use crate::{Error, ErrorContext, Result};

/// Provider-agnostic entry point.
///
/// Holds one driver per [`Route`] and no mutable state; a single instance can
/// serve concurrent callers. Each call makes exactly one upstream attempt and
/// adapter errors are returned unchanged.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    pub(crate) drivers: HashMap<Route, Arc<dyn ProviderDriver>>,
}

impl Dispatcher {
    /// Dispatcher with the production endpoints and environment-derived transport settings.
    pub fn new() -> Result<Self> {
        crate::client::builder::DispatcherBuilder::from_env().build()
    }

    pub fn builder() -> crate::client::builder::DispatcherBuilder {
        crate::client::builder::DispatcherBuilder::new()
    }

    pub(crate) fn driver(&self, route: Route) -> Result<&Arc<dyn ProviderDriver>> {
        self.drivers.get(&route).ok_or_else(|| {
            Error::configuration_with_context(
                format!("no driver registered for route '{}'", route),
                ErrorContext::new().with_source("dispatcher"),
            )
        })
    }

    /// Run one generation against the selected provider.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        selection: &ProviderSelection,
    ) -> Result<GenerationResult> {
        let route = selection.route();
        let driver = self.driver(route)?;
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "generate",
            request_id = %request_id,
            provider = %selection.provider,
            route = %route,
        );

        async move {
            info!(model = %selection.model, operation = %request.operation, "dispatching generation");
            let result = driver.generate(request, selection).await;
            match &result {
                Ok(variants) => info!(variants = variants.len(), "generation complete"),
                Err(e) => warn!(error = %e, "generation failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Snapshot `config`, build the request from the catalog and generate.
    pub async fn generate_with<C>(
        &self,
        config: &C,
        operation: Operation,
        input: &str,
        tone: Option<&str>,
    ) -> Result<GenerationResult>
    where
        C: ConfigurationProvider + ?Sized,
    {
        let settings = config.settings();
        let request = GenerationRequest::for_operation(operation, input, tone, &settings);
        let selection = settings.selection();
        self.generate(&request, &selection).await
    }
}
