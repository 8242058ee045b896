#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;

pub mod response;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use error::{BoxedError, Error, ErrorKind, Result};
use openeo_runtime::chain::ProcessChain;
pub use response::{BackendResponse, ModuleListing};
pub use service::ActiniaService;

/// Tracing target for backend bridge operations.
pub const TRACING_TARGET: &str = "openeo_actinia";

/// Core trait for talking to an actinia instance.
///
/// Implement this trait to run compiled process chains on a backend.
#[async_trait::async_trait]
pub trait ActiniaProvider: Send + Sync {
    /// Submits a process chain for asynchronous execution in `location`.
    ///
    /// Non-2xx answers are returned as a response, not as an error.
    async fn submit_chain(&self, location: &str, chain: &ProcessChain) -> Result<BackendResponse>;

    /// Lists the modules the backend offers.
    async fn list_modules(&self) -> Result<ModuleListing>;
}
