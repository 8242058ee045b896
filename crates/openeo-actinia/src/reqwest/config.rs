//! Reqwest client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default actinia REST API base URL.
pub const DEFAULT_ACTINIA_URL: &str = "http://127.0.0.1:8088/api/v3/";

/// Default actinia user and password.
pub const DEFAULT_ACTINIA_CREDENTIAL: &str = "actinia-gdi";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the actinia HTTP client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the actinia REST API
    #[cfg_attr(
        feature = "config",
        arg(long = "actinia-url", env = "ACTINIA_URL", default_value = DEFAULT_ACTINIA_URL)
    )]
    #[serde(default = "default_actinia_url")]
    pub actinia_url: Url,

    /// User name for HTTP basic authentication
    #[cfg_attr(
        feature = "config",
        arg(long = "actinia-user", env = "ACTINIA_USER", default_value = DEFAULT_ACTINIA_CREDENTIAL)
    )]
    #[serde(default = "default_credential")]
    pub actinia_user: String,

    /// Password for HTTP basic authentication
    #[cfg_attr(
        feature = "config",
        arg(
            long = "actinia-password",
            env = "ACTINIA_PASSWORD",
            default_value = DEFAULT_ACTINIA_CREDENTIAL,
            hide_env_values = true
        )
    )]
    #[serde(default = "default_credential")]
    pub actinia_password: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_actinia_url() -> Url {
    Url::parse(DEFAULT_ACTINIA_URL).expect("default actinia url is valid")
}

fn default_credential() -> String {
    DEFAULT_ACTINIA_CREDENTIAL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            actinia_url: default_actinia_url(),
            actinia_user: default_credential(),
            actinia_password: default_credential(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl fmt::Debug for ReqwestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestConfig")
            .field("actinia_url", &self.actinia_url.as_str())
            .field("actinia_user", &self.actinia_user)
            .field("actinia_password", &"<redacted>")
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ReqwestConfig {
    /// Create a new configuration for the given API base URL.
    pub fn new(actinia_url: Url) -> Self {
        Self {
            actinia_url,
            ..Self::default()
        }
    }

    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("openeo-actinia/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Returns the base URL with a trailing slash, so relative paths
    /// resolve below it.
    pub fn base_url(&self) -> Url {
        let mut url = self.actinia_url.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_actinia_url(mut self, actinia_url: Url) -> Self {
        self.actinia_url = actinia_url;
        self
    }

    /// Set the basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.actinia_user = user.into();
        self.actinia_password = password.into();
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
