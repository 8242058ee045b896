//! Backend service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use openeo_runtime::chain::ProcessChain;
use openeo_runtime::{CompiledGraph, ProcessRegistry};

use crate::{ActiniaProvider, BackendResponse, Error, ModuleListing, Result, TRACING_TARGET};

/// Backend service wrapper with observability.
///
/// This wrapper adds structured logging to any [`ActiniaProvider`].
/// The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct ActiniaService {
    inner: Arc<dyn ActiniaProvider>,
}

impl fmt::Debug for ActiniaService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiniaService").finish_non_exhaustive()
    }
}

impl ActiniaService {
    /// Creates a new backend service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: ActiniaProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Submits a process chain for asynchronous execution in `location`.
    pub async fn submit_chain(
        &self,
        location: &str,
        chain: &ProcessChain,
    ) -> Result<BackendResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            location,
            steps = chain.len(),
            "Submitting process chain"
        );

        let result = self.inner.submit_chain(location, chain).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    target: TRACING_TARGET,
                    location,
                    status_code = response.status_code,
                    resource_id = response.resource_id(),
                    elapsed_ms = elapsed.as_millis(),
                    "Process chain accepted"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    location,
                    status_code = response.status_code,
                    body = %response.body,
                    elapsed_ms = elapsed.as_millis(),
                    "Process chain rejected"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    location,
                    error = %error,
                    retryable = error.is_retryable(),
                    elapsed_ms = elapsed.as_millis(),
                    "Process chain submission error"
                );
            }
        }

        result
    }

    /// Submits a compiled process graph to its location.
    pub async fn submit_compiled(&self, compiled: &CompiledGraph) -> Result<BackendResponse> {
        self.submit_chain(compiled.location(), &compiled.chain())
            .await
    }

    /// Lists the modules the backend offers.
    pub async fn list_modules(&self) -> Result<ModuleListing> {
        let started_at = Instant::now();
        let result = self.inner.list_modules().await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(listing) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    status_code = listing.status_code,
                    modules = listing.modules.len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Listed backend modules"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Module listing error"
                );
            }
        }

        result
    }

    /// Registers every module the backend offers in `registry`.
    ///
    /// Returns the number of registered processes.
    ///
    /// # Errors
    ///
    /// Fails if the listing fails or the backend answers with a non-2xx
    /// status; the registry is left untouched in that case.
    pub async fn discover_into(&self, registry: &mut ProcessRegistry) -> Result<usize> {
        let listing = self.list_modules().await?;
        if !listing.is_success() {
            return Err(Error::external_error().with_message(format!(
                "module listing failed with status {}",
                listing.status_code
            )));
        }

        Ok(registry.import_modules(&listing.modules))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use openeo_runtime::chain::BackendCommand;
    use openeo_runtime::registry::BackendModule;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct MockProvider {
        status_code: u16,
        modules: Vec<BackendModule>,
        submitted: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait::async_trait]
    impl ActiniaProvider for MockProvider {
        async fn submit_chain(
            &self,
            location: &str,
            chain: &ProcessChain,
        ) -> Result<BackendResponse> {
            self.submitted
                .lock()
                .unwrap()
                .push((location.to_owned(), chain.len()));
            Ok(BackendResponse::new(
                self.status_code,
                json!({ "resource_id": "resource_id-1", "status": "accepted" }),
            ))
        }

        async fn list_modules(&self) -> Result<ModuleListing> {
            Ok(ModuleListing::new(self.status_code, self.modules.clone()))
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl ActiniaProvider for FailingProvider {
        async fn submit_chain(&self, _: &str, _: &ProcessChain) -> Result<BackendResponse> {
            Err(Error::timeout().with_message("no answer"))
        }

        async fn list_modules(&self) -> Result<ModuleListing> {
            Err(Error::network_error())
        }
    }

    #[tokio::test]
    async fn test_submit_chain() {
        let service = ActiniaService::new(MockProvider {
            status_code: 200,
            ..Default::default()
        });
        let chain = ProcessChain::new(vec![BackendCommand::new("get_data_1", "g.region")]);

        let response = service.submit_chain("nc", &chain).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.resource_id(), Some("resource_id-1"));
    }

    #[tokio::test]
    async fn test_rejected_chain_is_not_an_error() {
        let service = ActiniaService::new(MockProvider {
            status_code: 400,
            ..Default::default()
        });
        let chain = ProcessChain::new(Vec::new());

        let response = service.submit_chain("nc", &chain).await.unwrap();
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_submit_compiled() {
        let provider = Arc::new(MockProvider {
            status_code: 200,
            ..Default::default()
        });
        let compiled = CompiledGraph::new(
            "ECAD",
            vec!["precipitation_min_time".to_owned()],
            vec![
                BackendCommand::new("get_data_1", "t.info"),
                BackendCommand::new("min_time_2", "t.rast.series"),
            ],
        );

        let service = ActiniaService {
            inner: provider.clone(),
        };
        service.submit_compiled(&compiled).await.unwrap();
        assert_eq!(
            *provider.submitted.lock().unwrap(),
            vec![("ECAD".to_owned(), 2)]
        );
    }

    #[tokio::test]
    async fn test_discover_into() {
        let module = BackendModule::new("r.info", "Outputs basic information about a raster map.");
        let service = ActiniaService::new(MockProvider {
            status_code: 200,
            modules: vec![module],
            ..Default::default()
        });

        let mut registry = ProcessRegistry::builtin();
        assert_eq!(service.discover_into(&mut registry).await.unwrap(), 1);
        assert!(registry.contains("r_info"));
    }

    #[tokio::test]
    async fn test_discover_into_rejects_failed_listing() {
        let service = ActiniaService::new(MockProvider {
            status_code: 401,
            modules: vec![BackendModule::new("r.info", "")],
            ..Default::default()
        });

        let mut registry = ProcessRegistry::new();
        let error = service.discover_into(&mut registry).await.unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::ExternalError);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let service = ActiniaService::new(FailingProvider);
        let chain = ProcessChain::new(Vec::new());

        let error = service.submit_chain("nc", &chain).await.unwrap_err();
        assert!(error.is_retryable());
        assert!(service.list_modules().await.is_err());
    }
}
