//! Backend process chain types.
//!
//! A compiled process graph is a [`ProcessChain`]: an ordered list of
//! [`BackendCommand`]s in the format the actinia execution engine accepts.

mod command;

use serde::{Deserialize, Serialize};

pub use command::{
    BackendCommand, CommandInput, CommandOutput, DataKind, ExportDescriptor, ImportDescriptor,
};

/// Version of the process chain format.
pub const CHAIN_VERSION: &str = "1";

/// An ordered list of backend commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessChain {
    /// Commands in execution order.
    pub list: Vec<BackendCommand>,
    /// Chain format version.
    pub version: String,
}

impl ProcessChain {
    /// Creates a chain from commands in execution order.
    pub fn new(list: Vec<BackendCommand>) -> Self {
        Self {
            list,
            version: CHAIN_VERSION.to_owned(),
        }
    }

    /// Returns the number of commands.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns whether the chain has no commands.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
