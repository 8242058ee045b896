//! Convenient re-exports for common use.

pub use crate::chain::{BackendCommand, ProcessChain};
pub use crate::engine::{
    CompilationContext, CompiledGraph, CompilerConfig, GraphCompiler, StepIdStrategy, StepIds,
};
pub use crate::error::{BoxedError, Error, ErrorKind, ErrorResponse, Result};
pub use crate::graph::{Argument, GraphId, ProcessGraphNode, ProcessId, StoredGraph};
pub use crate::job::JobStatus;
pub use crate::registry::{
    BackendModule, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    ProcessRegistry,
};
