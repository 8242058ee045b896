//! Process graph model.
//!
//! A process graph is a tree of [`ProcessGraphNode`]s. Each node names a
//! process and carries its [`Argument`]s, which are either literal JSON
//! values or nested nodes whose outputs feed this node.

mod node;
mod process_id;
mod stored;

pub use node::{Argument, ProcessGraphNode};
pub use process_id::ProcessId;
pub use stored::{GRAPH_ID_PREFIX, GraphId, ParseGraphIdError, StoredGraph};
