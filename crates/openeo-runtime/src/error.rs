//! Process graph compilation errors.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for compilation operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stable categories of compilation failures.
///
/// The string form is used as the `code` of the error object returned to
/// clients and does not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The graph (or one of its nodes) does not have the shape of a node.
    MalformedGraph,
    /// A node names a process the registry does not know.
    UnknownProcess,
    /// A process was invoked without one of its required arguments.
    MissingArgument,
    /// A process compiler failed while emitting its commands.
    CompilationError,
    /// The graph does not load any data.
    NoDataReferenced,
    /// The graph loads data from more than one location.
    MultiLocationGraph,
}

/// Errors that can occur while compiling a process graph.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph is missing, not an object, or carries an invalid process id.
    #[error("malformed process graph: {0}")]
    MalformedGraph(String),

    /// The process id is not present in the registry.
    #[error("unknown process '{0}'")]
    UnknownProcess(String),

    /// A required argument is absent from the node.
    #[error("process '{process_id}' is missing required argument '{argument}'")]
    MissingArgument {
        /// Process that requires the argument.
        process_id: String,
        /// Name of the missing argument.
        argument: String,
    },

    /// A process compiler failed.
    #[error("compilation of process '{process_id}' failed: {message}")]
    Compilation {
        /// Process whose compiler failed.
        process_id: String,
        /// Error message.
        message: String,
        /// Underlying source error, if any.
        #[source]
        source: Option<BoxedError>,
    },

    /// No source process registered a location.
    #[error("the process graph does not reference any data")]
    NoDataReferenced,

    /// Source processes registered more than one location.
    #[error("processes can only be defined for a single location, found: {}", locations.join(", "))]
    MultiLocationGraph {
        /// All locations referenced by the graph.
        locations: Vec<String>,
    },
}

impl Error {
    /// Creates a malformed graph error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedGraph(message.into())
    }

    /// Creates a missing argument error.
    pub fn missing_argument(process_id: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            process_id: process_id.into(),
            argument: argument.into(),
        }
    }

    /// Creates a compilation error without a source.
    pub fn compilation(process_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compilation {
            process_id: process_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to a compilation error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_source(self, error: impl Into<BoxedError>) -> Self {
        match self {
            Self::Compilation {
                process_id,
                message,
                ..
            } => Self::Compilation {
                process_id,
                message,
                source: Some(error.into()),
            },
            other => other,
        }
    }

    /// Returns the category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedGraph(_) => ErrorKind::MalformedGraph,
            Self::UnknownProcess(_) => ErrorKind::UnknownProcess,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::Compilation { .. } => ErrorKind::CompilationError,
            Self::NoDataReferenced => ErrorKind::NoDataReferenced,
            Self::MultiLocationGraph { .. } => ErrorKind::MultiLocationGraph,
        }
    }

    /// Returns the HTTP status the request layer reports for this error.
    ///
    /// Every compilation failure is caused by the submitted graph.
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns whether the error was caused by the client's input.
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// Error object reported to openEO clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Unique identifier of this error occurrence.
    pub id: Uuid,
    /// Stable error code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<Error> for ErrorResponse {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}
