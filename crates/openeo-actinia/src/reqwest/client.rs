//! Reqwest-based HTTP client for the actinia REST API.

use std::sync::Arc;

use openeo_runtime::chain::ProcessChain;
use openeo_runtime::registry::BackendModule;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use url::Url;

use super::{Error, ReqwestConfig, TRACING_TARGET};
use crate::{ActiniaProvider, ActiniaService, BackendResponse, ModuleListing};

/// Body of the module listing endpoint.
#[derive(Debug, Deserialize)]
struct ModulesBody {
    #[serde(default)]
    processes: Vec<BackendModule>,
}

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
    base_url: Url,
}

/// Reqwest-based HTTP client for an actinia instance.
///
/// This client implements the [`ActiniaProvider`] trait. Every request
/// carries the configured basic authentication credentials.
///
/// # Examples
///
/// ```rust,ignore
/// use openeo_actinia::reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let response = client.submit_chain("nc", &chain).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: ReqwestConfig) -> crate::Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            actinia_url = %config.actinia_url,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let base_url = config.base_url();
        let inner = ReqwestClientInner {
            http,
            config,
            base_url,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into an [`ActiniaService`] for use with dependency injection.
    pub fn into_service(self) -> ActiniaService {
        ActiniaService::new(self)
    }

    /// Returns the URL of an endpoint below the API base URL.
    pub fn endpoint(&self, path: &str) -> crate::Result<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| Error::from(e).into())
    }

    /// Returns the asynchronous export endpoint of a location.
    pub fn processing_endpoint(&self, location: &str) -> crate::Result<Url> {
        if location.is_empty() || location.contains(['/', '?', '#']) {
            return Err(crate::Error::invalid_input()
                .with_message(format!("invalid location name '{location}'")));
        }
        self.endpoint(&format!("locations/{location}/processing_async_export"))
    }

    fn authenticated(&self, request: RequestBuilder) -> RequestBuilder {
        let config = &self.inner.config;
        request.basic_auth(&config.actinia_user, Some(&config.actinia_password))
    }
}

#[async_trait::async_trait]
impl ActiniaProvider for ReqwestClient {
    async fn submit_chain(
        &self,
        location: &str,
        chain: &ProcessChain,
    ) -> crate::Result<BackendResponse> {
        let url = self.processing_endpoint(location)?;
        let payload = serde_json::to_vec(chain).map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            steps = chain.len(),
            "Posting process chain"
        );

        let http_response = self
            .authenticated(self.inner.http.post(url))
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(Error::from)?;

        let status_code = http_response.status().as_u16();
        let text = http_response.text().await.map_err(Error::from)?;
        let response = BackendResponse::from_text(status_code, text);

        tracing::debug!(
            target: TRACING_TARGET,
            status_code,
            success = response.is_success(),
            "Process chain posted"
        );

        Ok(response)
    }

    async fn list_modules(&self) -> crate::Result<ModuleListing> {
        let url = self.endpoint("modules")?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            "Fetching module listing"
        );

        let http_response = self
            .authenticated(self.inner.http.get(url))
            .send()
            .await
            .map_err(Error::from)?;

        let status_code = http_response.status().as_u16();
        if !http_response.status().is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status_code,
                "Module listing refused"
            );
            return Ok(ModuleListing::new(status_code, Vec::new()));
        }

        let text = http_response.text().await.map_err(Error::from)?;
        let body: ModulesBody = serde_json::from_str(&text).map_err(Error::from)?;
        Ok(ModuleListing::new(status_code, body.processes))
    }
}
