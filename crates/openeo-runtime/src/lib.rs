#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod chain;
pub mod engine;
mod error;
pub mod graph;
pub mod job;
pub mod process;
pub mod registry;

#[doc(hidden)]
pub mod prelude;

pub use engine::{CompilationContext, CompiledGraph, CompilerConfig, GraphCompiler};
pub use error::{BoxedError, Error, ErrorKind, ErrorResponse, Result};
pub use registry::ProcessRegistry;

/// Tracing target for runtime operations.
pub const TRACING_TARGET: &str = "openeo_runtime";
