//! Process graph node types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProcessId;
use crate::error::{Error, Result};

/// Key under which a node carries its process id.
const PROCESS_ID_KEY: &str = "process_id";
/// Keys under which a node may carry an explicit argument map.
const ARGUMENTS_KEYS: [&str; 2] = ["arguments", "args"];
/// Schema keys that annotate a node without being arguments.
const RESERVED_KEYS: [&str; 1] = ["result"];

/// A single argument of a process graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    /// A literal JSON value.
    Literal(Value),
    /// The output of an upstream process.
    Node(Box<ProcessGraphNode>),
    /// The outputs of several upstream processes.
    Nodes(Vec<ProcessGraphNode>),
}

impl Argument {
    /// Classifies a JSON value as literal, nested node, or list of nodes.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            value if is_node(&value) => Ok(Self::Node(Box::new(ProcessGraphNode::from_value(
                value,
            )?))),
            Value::Array(items) if !items.is_empty() && items.iter().all(is_node) => {
                let nodes = items
                    .into_iter()
                    .map(ProcessGraphNode::from_value)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Nodes(nodes))
            }
            other => Ok(Self::Literal(other)),
        }
    }

    /// Returns whether this argument references upstream processes.
    pub const fn is_nested(&self) -> bool {
        matches!(self, Self::Node(_) | Self::Nodes(_))
    }

    /// Returns the literal value, if this is a literal.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Self::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl From<ProcessGraphNode> for Argument {
    fn from(node: ProcessGraphNode) -> Self {
        Self::Node(Box::new(node))
    }
}

impl From<Vec<ProcessGraphNode>> for Argument {
    fn from(nodes: Vec<ProcessGraphNode>) -> Self {
        Self::Nodes(nodes)
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// One operation in a client-submitted process graph.
///
/// Arguments are kept in name order so that compiling the same graph twice
/// visits upstream nodes in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ProcessGraphNode {
    process_id: ProcessId,
    arguments: BTreeMap<String, Argument>,
}

impl ProcessGraphNode {
    /// Creates a node without arguments.
    pub fn new(process_id: ProcessId) -> Self {
        Self {
            process_id,
            arguments: BTreeMap::new(),
        }
    }

    /// Adds an argument, replacing any previous value under the same name.
    pub fn with_argument(mut self, name: impl Into<String>, argument: impl Into<Argument>) -> Self {
        self.arguments.insert(name.into(), argument.into());
        self
    }

    /// Parses a node from its JSON representation.
    ///
    /// Arguments may be given under `arguments` (or `args`) and as additional
    /// top-level keys next to `process_id`; when both name the same argument
    /// the explicit argument map wins.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            Value::Null => return Err(Error::malformed("process graph is empty")),
            other => {
                return Err(Error::malformed(format!(
                    "expected a process graph node, found {}",
                    json_type(&other)
                )));
            }
        };

        let process_id = match object.remove(PROCESS_ID_KEY) {
            Some(Value::String(id)) => ProcessId::new(id)?,
            Some(other) => {
                return Err(Error::malformed(format!(
                    "process_id must be a string, found {}",
                    json_type(&other)
                )));
            }
            None => return Err(Error::malformed("node has no process_id")),
        };

        let explicit = take_explicit_arguments(&mut object, &process_id)?;
        for key in RESERVED_KEYS {
            object.remove(key);
        }

        let mut arguments = BTreeMap::new();
        for (name, value) in object.into_iter().chain(explicit) {
            arguments.insert(name, Argument::from_value(value)?);
        }

        Ok(Self {
            process_id,
            arguments,
        })
    }

    /// Returns the process id.
    #[inline]
    pub fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    /// Returns all arguments in name order.
    #[inline]
    pub fn arguments(&self) -> &BTreeMap<String, Argument> {
        &self.arguments
    }

    /// Returns a single argument.
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.get(name)
    }

    /// Returns whether this node consumes no upstream data.
    pub fn is_source(&self) -> bool {
        !self.arguments.values().any(Argument::is_nested)
    }

    /// Returns the number of nodes in the tree rooted at this node.
    pub fn node_count(&self) -> usize {
        1 + self
            .arguments
            .values()
            .map(|argument| match argument {
                Argument::Literal(_) => 0,
                Argument::Node(node) => node.node_count(),
                Argument::Nodes(nodes) => nodes.iter().map(Self::node_count).sum(),
            })
            .sum::<usize>()
    }
}

impl TryFrom<Value> for ProcessGraphNode {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

/// Removes and merges every explicit argument map from the node object.
fn take_explicit_arguments(
    object: &mut Map<String, Value>,
    process_id: &ProcessId,
) -> Result<Map<String, Value>> {
    let mut merged = Map::new();
    for key in ARGUMENTS_KEYS {
        match object.remove(key) {
            None | Some(Value::Null) => {}
            Some(Value::Object(arguments)) => merged.extend(arguments),
            Some(other) => {
                return Err(Error::malformed(format!(
                    "'{key}' of process '{process_id}' must be an object, found {}",
                    json_type(&other)
                )));
            }
        }
    }
    Ok(merged)
}

fn is_node(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key(PROCESS_ID_KEY))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
