//! Backend response types.

use jiff::Timestamp;
use openeo_runtime::registry::BackendModule;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returns whether an HTTP status code denotes success.
fn is_success(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

/// Response of the backend to a submitted process chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    /// HTTP status code returned by the backend.
    pub status_code: u16,
    /// Response body; non-JSON bodies are kept as a string.
    pub body: Value,
    /// Timestamp when the response was received.
    pub received_at: Timestamp,
}

impl BackendResponse {
    /// Creates a response received now.
    pub fn new(status_code: u16, body: Value) -> Self {
        Self {
            status_code,
            body,
            received_at: Timestamp::now(),
        }
    }

    /// Creates a response from a raw body, parsing it as JSON when possible.
    pub fn from_text(status_code: u16, text: String) -> Self {
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Self::new(status_code, body)
    }

    /// Returns whether the backend accepted the chain (2xx status code).
    pub fn is_success(&self) -> bool {
        is_success(self.status_code)
    }

    /// Returns the resource id the backend assigned to the job, if any.
    pub fn resource_id(&self) -> Option<&str> {
        self.body.get("resource_id").and_then(Value::as_str)
    }
}

/// Modules offered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleListing {
    /// HTTP status code returned by the backend.
    pub status_code: u16,
    /// Listed modules; empty on failure.
    pub modules: Vec<BackendModule>,
}

impl ModuleListing {
    /// Creates a module listing.
    pub fn new(status_code: u16, modules: Vec<BackendModule>) -> Self {
        Self {
            status_code,
            modules,
        }
    }

    /// Returns whether the backend answered with a 2xx status code.
    pub fn is_success(&self) -> bool {
        is_success(self.status_code)
    }
}
