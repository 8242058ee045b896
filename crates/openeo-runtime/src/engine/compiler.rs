//! Recursive process graph compiler.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use super::{CompilationContext, CompiledGraph, CompilerConfig};
use crate::error::{Error, Result};
use crate::graph::{Argument, ProcessGraphNode, StoredGraph};
use crate::registry::{ProcessArguments, ProcessOutput, ProcessRegistry, ResolvedArgument};

/// Tracing target for graph compilation.
pub const TRACING_TARGET: &str = "openeo_runtime::engine";

/// Compiles process graphs into backend process chains.
///
/// The compiler holds no per-graph state; every call to [`compile`]
/// creates its own [`CompilationContext`], so a single compiler can be
/// shared between concurrent requests.
///
/// [`compile`]: GraphCompiler::compile
#[derive(Debug, Clone)]
pub struct GraphCompiler {
    registry: Arc<ProcessRegistry>,
    config: CompilerConfig,
}

impl GraphCompiler {
    /// Creates a compiler with the default configuration.
    pub fn new(registry: Arc<ProcessRegistry>) -> Self {
        Self::with_config(registry, CompilerConfig::default())
    }

    /// Creates a compiler with a custom configuration.
    pub fn with_config(registry: Arc<ProcessRegistry>, config: CompilerConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the registry processes are resolved against.
    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Returns the compiler configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Parses and compiles the JSON representation of a process graph.
    pub fn compile_value(&self, value: &Value) -> Result<CompiledGraph> {
        let root = ProcessGraphNode::from_value(value.clone())?;
        self.compile(&root)
    }

    /// Compiles a stored process graph.
    pub fn compile_stored(&self, graph: &StoredGraph) -> Result<CompiledGraph> {
        tracing::debug!(
            target: TRACING_TARGET,
            graph_id = %graph.id,
            "Compiling stored process graph"
        );
        self.compile(&graph.process_graph)
    }

    /// Compiles a process graph rooted at `root`.
    ///
    /// Upstream commands always precede the commands that consume their
    /// outputs. On failure no commands are returned.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while compiling any node, or
    /// [`Error::NoDataReferenced`] / [`Error::MultiLocationGraph`] if the
    /// graph does not read from exactly one location.
    pub fn compile(&self, root: &ProcessGraphNode) -> Result<CompiledGraph> {
        let mut ctx = CompilationContext::new(self.config.step_ids.generator());
        let output = self.compile_node(root, &mut ctx, 1).inspect_err(|error| {
            tracing::debug!(
                target: TRACING_TARGET,
                process_id = %root.process_id(),
                code = %error.kind(),
                error = %error,
                "Process graph compilation failed"
            );
        })?;

        let location = ctx.into_location()?;
        tracing::debug!(
            target: TRACING_TARGET,
            location = %location,
            commands = output.commands.len(),
            outputs = output.output_ids.len(),
            "Compiled process graph"
        );

        Ok(CompiledGraph::new(
            location,
            output.output_ids,
            output.commands,
        ))
    }

    fn compile_node(
        &self,
        node: &ProcessGraphNode,
        ctx: &mut CompilationContext,
        depth: usize,
    ) -> Result<ProcessOutput> {
        if depth > self.config.max_depth {
            return Err(Error::malformed(format!(
                "process graph exceeds the maximum depth of {}",
                self.config.max_depth
            )));
        }

        let process_id = node.process_id();
        let compiler = self.registry.resolve(process_id.as_str())?;

        let mut commands = Vec::new();
        let mut values = BTreeMap::new();
        for (name, argument) in node.arguments() {
            let resolved = match argument {
                Argument::Literal(value) => ResolvedArgument::Literal(value.clone()),
                Argument::Node(upstream) => {
                    let output = self.compile_node(upstream, ctx, depth + 1)?;
                    commands.extend(output.commands);
                    ResolvedArgument::Data(output.output_ids)
                }
                Argument::Nodes(upstream) => {
                    let mut ids = Vec::new();
                    for node in upstream {
                        let output = self.compile_node(node, ctx, depth + 1)?;
                        commands.extend(output.commands);
                        ids.extend(output.output_ids);
                    }
                    ResolvedArgument::Data(ids)
                }
            };
            values.insert(name.clone(), resolved);
        }

        let arguments = ProcessArguments::new(process_id.clone(), values);
        let output = panic::catch_unwind(AssertUnwindSafe(|| compiler.compile(&arguments, ctx)))
            .map_err(|payload| {
                Error::compilation(process_id.as_str(), panic_message(payload.as_ref()))
            })??;
        if output.output_ids.is_empty() {
            return Err(Error::compilation(
                process_id.as_str(),
                "process produced no output",
            ));
        }

        tracing::trace!(
            target: TRACING_TARGET,
            process_id = %process_id,
            depth,
            commands = output.commands.len(),
            "Compiled process"
        );

        commands.extend(output.commands);
        Ok(ProcessOutput::new(output.output_ids, commands))
    }
}

/// Extracts the message of a panic raised by a process compiler.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "process compiler panicked".to_owned()
    }
}
