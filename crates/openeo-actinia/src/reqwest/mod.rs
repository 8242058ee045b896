//! Reqwest-based HTTP client for the actinia REST API.
//!
//! This module provides a reqwest-based implementation of the [`ActiniaProvider`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use openeo_actinia::ActiniaService;
//! use openeo_actinia::reqwest::{ReqwestClient, ReqwestConfig};
//!
//! // Create a client with default configuration
//! let client = ReqwestClient::new(ReqwestConfig::default())?;
//!
//! // Convert to a service for dependency injection
//! let service: ActiniaService = client.into_service();
//! ```
//!
//! [`ActiniaProvider`]: crate::ActiniaProvider

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::ReqwestConfig;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "openeo_actinia::reqwest";
