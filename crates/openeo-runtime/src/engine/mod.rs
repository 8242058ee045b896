//! Graph compilation engine.
//!
//! [`GraphCompiler`] walks a process graph depth-first, compiles every
//! upstream node before the node consuming it, and concatenates the emitted
//! commands into a [`CompiledGraph`]. Per-graph state lives in a
//! [`CompilationContext`] created for each compilation.

mod compiled;
mod compiler;
mod config;
mod context;

pub use compiled::CompiledGraph;
pub use compiler::{GraphCompiler, TRACING_TARGET};
pub use config::{
    CompilerConfig, CompilerConfigBuilder, CompilerConfigBuilderError, DEFAULT_MAX_DEPTH,
};
pub use context::{CompilationContext, StepIdStrategy, StepIds};
