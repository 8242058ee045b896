//! Process compiler trait and its inputs and outputs.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::{Error, Result};
use crate::graph::ProcessId;

/// Compiles one process invocation into backend commands.
///
/// Implementations receive the node's arguments with every nested node
/// already replaced by the dataset names it produced. A panic inside
/// [`compile`](ProcessCompiler::compile) is reported as [`Error::Compilation`].
pub trait ProcessCompiler: Send + Sync {
    /// Emits the commands for one invocation of the process.
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput>;
}

impl<F> ProcessCompiler for F
where
    F: Fn(&ProcessArguments, &mut CompilationContext) -> Result<ProcessOutput> + Send + Sync,
{
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        self(arguments, ctx)
    }
}

/// An argument after upstream nodes have been compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedArgument {
    /// A literal JSON value from the graph.
    Literal(Value),
    /// Dataset names produced by upstream processes.
    Data(Vec<String>),
}

/// Arguments passed to a [`ProcessCompiler`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessArguments {
    process_id: ProcessId,
    values: BTreeMap<String, ResolvedArgument>,
}

impl ProcessArguments {
    /// Creates an argument set for the given process.
    pub fn new(process_id: ProcessId, values: BTreeMap<String, ResolvedArgument>) -> Self {
        Self { process_id, values }
    }

    /// Returns the id of the invoked process.
    #[inline]
    pub fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    /// Returns all arguments in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedArgument)> {
        self.values
            .iter()
            .map(|(name, argument)| (name.as_str(), argument))
    }

    /// Returns a single argument.
    pub fn get(&self, name: &str) -> Option<&ResolvedArgument> {
        self.values.get(name)
    }

    /// Returns whether any argument carries upstream data.
    pub fn has_data(&self) -> bool {
        self.values
            .values()
            .any(|argument| matches!(argument, ResolvedArgument::Data(_)))
    }

    /// Returns a literal argument; `null` counts as absent.
    pub fn literal(&self, name: &str) -> Option<&Value> {
        match self.values.get(name) {
            Some(ResolvedArgument::Literal(Value::Null)) | None => None,
            Some(ResolvedArgument::Literal(value)) => Some(value),
            Some(ResolvedArgument::Data(_)) => None,
        }
    }

    /// Returns a required string argument.
    ///
    /// # Errors
    ///
    /// [`Error::MissingArgument`] if absent or `null`,
    /// [`Error::Compilation`] if not a string.
    pub fn require_str(&self, name: &str) -> Result<&str> {
        match self.values.get(name) {
            Some(ResolvedArgument::Literal(Value::String(value))) => Ok(value.as_str()),
            Some(ResolvedArgument::Literal(Value::Null)) | None => Err(self.missing(name)),
            Some(_) => Err(self.invalid(name, "a string")),
        }
    }

    /// Returns an optional string argument.
    pub fn optional_str(&self, name: &str) -> Result<Option<&str>> {
        match self.values.get(name) {
            Some(ResolvedArgument::Literal(Value::String(value))) => Ok(Some(value.as_str())),
            Some(ResolvedArgument::Literal(Value::Null)) | None => Ok(None),
            Some(_) => Err(self.invalid(name, "a string")),
        }
    }

    /// Returns a required numeric argument; numeric strings are accepted.
    pub fn require_number(&self, name: &str) -> Result<f64> {
        self.optional_number(name)?
            .ok_or_else(|| self.missing(name))
    }

    /// Returns an optional numeric argument; numeric strings are accepted.
    pub fn optional_number(&self, name: &str) -> Result<Option<f64>> {
        match self.values.get(name) {
            Some(ResolvedArgument::Literal(Value::Number(number))) => number
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(name, "a finite number")),
            Some(ResolvedArgument::Literal(Value::String(value))) => {
                let number = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| self.invalid(name, "a number").with_source(e))?;
                if !number.is_finite() {
                    return Err(self.invalid(name, "a finite number"));
                }
                Ok(Some(number))
            }
            Some(ResolvedArgument::Literal(Value::Null)) | None => Ok(None),
            Some(_) => Err(self.invalid(name, "a number")),
        }
    }

    /// Returns the dataset names of a data argument.
    pub fn data(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name) {
            Some(ResolvedArgument::Data(ids)) => Some(ids.as_slice()),
            _ => None,
        }
    }

    /// Returns the dataset names of a required data argument.
    pub fn require_data(&self, name: &str) -> Result<&[String]> {
        match self.values.get(name) {
            Some(ResolvedArgument::Data(ids)) => Ok(ids.as_slice()),
            Some(ResolvedArgument::Literal(Value::Null)) | None => Err(self.missing(name)),
            Some(_) => Err(self.invalid(name, "a process graph node")),
        }
    }

    /// Returns the only dataset name of a required data argument.
    pub fn require_single_data(&self, name: &str) -> Result<&str> {
        match self.require_data(name)? {
            [id] => Ok(id.as_str()),
            ids => Err(Error::compilation(
                self.process_id.as_str(),
                format!(
                    "argument '{name}' must produce exactly one dataset, got {}",
                    ids.len()
                ),
            )),
        }
    }

    /// Returns the primary data input of the process.
    ///
    /// Looks up `imagery` first and falls back to `data`; fails with
    /// [`Error::MissingArgument`] naming `imagery` when neither is present.
    pub fn primary_data(&self) -> Result<&[String]> {
        for name in PRIMARY_DATA_ARGUMENTS {
            if let Some(ids) = self.data(name) {
                return Ok(ids);
            }
        }
        self.require_data(PRIMARY_DATA_ARGUMENTS[0])
    }

    /// Returns the only dataset of the primary data input.
    pub fn primary_single_data(&self) -> Result<&str> {
        for name in PRIMARY_DATA_ARGUMENTS {
            if self.data(name).is_some() {
                return self.require_single_data(name);
            }
        }
        self.require_single_data(PRIMARY_DATA_ARGUMENTS[0])
    }

    fn missing(&self, name: &str) -> Error {
        Error::missing_argument(self.process_id.as_str(), name)
    }

    fn invalid(&self, name: &str, expected: &str) -> Error {
        Error::compilation(
            self.process_id.as_str(),
            format!("argument '{name}' must be {expected}"),
        )
    }
}

/// Names under which processes receive their main data input.
const PRIMARY_DATA_ARGUMENTS: [&str; 2] = ["imagery", "data"];

/// Result of compiling one process invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Names of the datasets produced, in order.
    pub output_ids: Vec<String>,
    /// Commands to run, in execution order.
    pub commands: Vec<BackendCommand>,
}

impl ProcessOutput {
    /// Creates a process output.
    pub fn new(output_ids: Vec<String>, commands: Vec<BackendCommand>) -> Self {
        Self {
            output_ids,
            commands,
        }
    }

    /// Creates an output with a single dataset and a single command.
    pub fn single(output_id: impl Into<String>, command: BackendCommand) -> Self {
        Self::new(vec![output_id.into()], vec![command])
    }
}
