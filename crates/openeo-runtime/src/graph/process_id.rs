//! Process identifier type.

use std::borrow::Borrow;
use std::str::FromStr;
use std::sync::LazyLock;

use derive_more::{Debug, Display};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static PROCESS_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("process id pattern is valid"));

/// Identifier of a process, matching `[A-Za-z0-9_]+`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Debug, Display)]
#[debug("{_0}")]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct ProcessId(String);

impl ProcessId {
    /// Creates a process id, rejecting anything outside `[A-Za-z0-9_]+`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if !PROCESS_ID_PATTERN.is_match(&id) {
            return Err(Error::malformed(format!(
                "invalid process id '{id}': expected [A-Za-z0-9_]+"
            )));
        }
        Ok(Self(id))
    }

    /// Creates a process id from an arbitrary name by replacing every
    /// character outside `[A-Za-z0-9_]` with `_`.
    ///
    /// Backend module names such as `r.slope.aspect` become `r_slope_aspect`.
    pub fn sanitize(name: &str) -> Self {
        let id: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if id.is_empty() {
            return Self("_".to_owned());
        }
        Self(id)
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProcessId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProcessId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ProcessId> for String {
    fn from(id: ProcessId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProcessId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProcessId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProcessId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProcessId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
