//! Result of compiling a process graph.

use serde::{Deserialize, Serialize};

use crate::chain::{BackendCommand, ProcessChain};

/// A compiled process graph, ready to be submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledGraph {
    location: String,
    output_ids: Vec<String>,
    commands: Vec<BackendCommand>,
}

impl CompiledGraph {
    /// Creates a compiled graph.
    pub fn new(
        location: impl Into<String>,
        output_ids: Vec<String>,
        commands: Vec<BackendCommand>,
    ) -> Self {
        Self {
            location: location.into(),
            output_ids,
            commands,
        }
    }

    /// Returns the single backend location the graph reads from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the datasets produced by the root process.
    pub fn output_ids(&self) -> &[String] {
        &self.output_ids
    }

    /// Returns the commands in execution order.
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Returns a process chain holding a copy of the commands.
    pub fn chain(&self) -> ProcessChain {
        ProcessChain::new(self.commands.clone())
    }

    /// Converts the graph into its process chain.
    pub fn into_chain(self) -> ProcessChain {
        ProcessChain::new(self.commands)
    }

    /// Splits the graph into its location and process chain.
    pub fn into_parts(self) -> (String, ProcessChain) {
        (self.location, ProcessChain::new(self.commands))
    }
}
