//! Stored process graph records.

use std::fmt;
use std::str::FromStr;

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProcessGraphNode;

/// Prefix of every stored graph identifier.
pub const GRAPH_ID_PREFIX: &str = "user-graph::";

/// Identifier of a stored process graph, rendered as `user-graph::<uuid>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(From, Into)]
#[serde(try_from = "String", into = "String")]
pub struct GraphId(Uuid);

impl GraphId {
    /// Creates a new random graph id.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a graph id from an existing UUID.
    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[inline]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GRAPH_ID_PREFIX}{}", self.0)
    }
}

impl fmt::Debug for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Error returned when parsing a [`GraphId`] fails.
#[derive(Debug, thiserror::Error)]
pub enum ParseGraphIdError {
    /// The identifier does not start with `user-graph::`.
    #[error("graph id must start with 'user-graph::'")]
    MissingPrefix,
    /// The identifier suffix is not a UUID.
    #[error("invalid graph id: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

impl FromStr for GraphId {
    type Err = ParseGraphIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = s
            .strip_prefix(GRAPH_ID_PREFIX)
            .ok_or(ParseGraphIdError::MissingPrefix)?;
        Ok(Self(Uuid::from_str(uuid)?))
    }
}

impl TryFrom<String> for GraphId {
    type Error = ParseGraphIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GraphId> for String {
    fn from(id: GraphId) -> Self {
        id.to_string()
    }
}

/// A process graph stored on behalf of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGraph {
    /// Identifier of the stored graph.
    pub id: GraphId,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Root node of the graph.
    pub process_graph: ProcessGraphNode,
}

impl StoredGraph {
    /// Creates a stored graph with a fresh identifier.
    pub fn new(process_graph: ProcessGraphNode) -> Self {
        Self {
            id: GraphId::new(),
            title: None,
            description: None,
            process_graph,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
