//! Process registry.
//!
//! The [`ProcessRegistry`] maps process ids to their [`ProcessDescription`]
//! and [`ProcessCompiler`]. It is populated once at startup, with the
//! built-in processes and optionally the modules discovered from the
//! backend, and then shared read-only behind an [`Arc`].

mod compiler;
mod description;
mod module;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use compiler::{ProcessArguments, ProcessCompiler, ProcessOutput, ResolvedArgument};
pub use description::{
    ParameterDescription, ProcessDescription, ReturnDescription, raster_cube_schema,
};
pub use module::{BackendModule, BackendModuleCompiler, ModuleParameter, ModuleSchema};

use crate::TRACING_TARGET;
use crate::error::{Error, Result};
use crate::graph::ProcessId;

/// A registered process.
#[derive(Clone)]
struct ProcessEntry {
    description: ProcessDescription,
    compiler: Arc<dyn ProcessCompiler>,
}

/// Registry of the processes a graph may invoke.
///
/// Entries keep their registration order. Registering an id twice replaces
/// the earlier entry in place, so every id is listed once.
#[derive(Clone, Default)]
pub struct ProcessRegistry {
    entries: Vec<ProcessEntry>,
    index: HashMap<ProcessId, usize>,
}

impl ProcessRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in processes.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::process::register_builtins(&mut registry);
        registry
    }

    /// Registers a process, replacing any earlier process with the same id.
    pub fn register<C>(&mut self, description: ProcessDescription, compiler: C)
    where
        C: ProcessCompiler + 'static,
    {
        self.register_arc(description, Arc::new(compiler));
    }

    /// Registers a process with a shared compiler.
    pub fn register_arc(
        &mut self,
        description: ProcessDescription,
        compiler: Arc<dyn ProcessCompiler>,
    ) {
        let id = description.id.clone();
        let entry = ProcessEntry {
            description,
            compiler,
        };

        match self.index.get(&id) {
            Some(&position) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    process_id = %id,
                    "Replacing registered process"
                );
                self.entries[position] = entry;
            }
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Returns the compiler of a process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProcess`] if the id is not registered. Lookup
    /// is exact and case-sensitive.
    pub fn resolve(&self, process_id: &str) -> Result<&dyn ProcessCompiler> {
        self.entry(process_id)
            .map(|entry| entry.compiler.as_ref())
            .ok_or_else(|| Error::UnknownProcess(process_id.to_owned()))
    }

    /// Returns the description of a process.
    pub fn describe(&self, process_id: &str) -> Option<&ProcessDescription> {
        self.entry(process_id).map(|entry| &entry.description)
    }

    /// Returns all descriptions in registration order.
    pub fn describe_all(&self) -> impl ExactSizeIterator<Item = &ProcessDescription> {
        self.entries.iter().map(|entry| &entry.description)
    }

    /// Returns whether a process is registered.
    pub fn contains(&self, process_id: &str) -> bool {
        self.entry(process_id).is_some()
    }

    /// Returns the number of registered processes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no process is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a process for every backend module.
    ///
    /// Modules declaring more than one output also get one pseudo-process
    /// per output, named `<module>_<output>`, that emits only that output.
    /// Returns the number of registrations performed.
    pub fn import_modules(&mut self, modules: &[BackendModule]) -> usize {
        let mut registered = 0;
        for module in modules {
            self.register(
                module.to_description(),
                BackendModuleCompiler::for_module(module),
            );
            registered += 1;

            if module.has_multiple_outputs() {
                for output in &module.returns {
                    self.register(
                        module.to_output_description(output),
                        BackendModuleCompiler::for_output(module, output),
                    );
                    registered += 1;
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            modules = modules.len(),
            registered,
            total = self.len(),
            "Imported backend modules"
        );
        registered
    }

    fn entry(&self, process_id: &str) -> Option<&ProcessEntry> {
        let position = *self.index.get(process_id)?;
        self.entries.get(position)
    }
}

impl fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field(
                "processes",
                &self
                    .entries
                    .iter()
                    .map(|entry| entry.description.id.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::chain::BackendCommand;
    use crate::engine::CompilationContext;

    fn description(id: &str, text: &str) -> ProcessDescription {
        ProcessDescription::new(ProcessId::new(id).unwrap(), text)
    }

    fn fixed(module: &'static str) -> impl ProcessCompiler {
        move |_: &ProcessArguments, ctx: &mut CompilationContext| -> Result<ProcessOutput> {
            let id = ctx.next_step_id("fixed");
            Ok(ProcessOutput::single("out", BackendCommand::new(id, module)))
        }
    }

    fn compile_with(registry: &ProcessRegistry, id: &str) -> BackendCommand {
        let args = ProcessArguments::new(ProcessId::new(id).unwrap(), Default::default());
        let mut ctx = CompilationContext::default();
        let compiler = registry.resolve(id).unwrap();
        compiler.compile(&args, &mut ctx).unwrap().commands.remove(0)
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ProcessRegistry::new();
        registry.register(description("first", "first"), fixed("g.list"));
        registry.register(description("slope", "old"), fixed("r.slope"));
        registry.register(description("slope", "new"), fixed("r.slope.aspect"));

        assert_eq!(registry.len(), 2);
        let ids: Vec<_> = registry.describe_all().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["first", "slope"]);
        assert_eq!(registry.describe("slope").unwrap().description, "new");
        assert_eq!(compile_with(&registry, "slope").module, "r.slope.aspect");
    }

    #[test]
    fn test_resolve_is_exact() {
        let mut registry = ProcessRegistry::new();
        registry.register(description("ndvi", "ndvi"), fixed("t.rast.mapcalc"));

        assert!(registry.contains("ndvi"));
        assert!(matches!(
            registry.resolve("NDVI"),
            Err(Error::UnknownProcess(id)) if id == "NDVI"
        ));
        assert!(registry.resolve("does_not_exist").is_err());
    }

    #[test]
    fn test_builtin_processes() {
        let registry = ProcessRegistry::builtin();
        for id in [
            "get_data",
            "filter_bbox",
            "filter_daterange",
            "min_time",
            "ndvi",
            "raster_exporter",
            "zonal_statistics",
            "udf_reduce_time",
        ] {
            assert!(registry.contains(id), "missing built-in process {id}");
        }
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_import_modules() {
        let modules: Vec<BackendModule> = serde_json::from_value(json!([
            {
                "id": "r.slope.aspect",
                "description": "Slope and aspect",
                "parameters": [
                    { "name": "elevation", "schema": { "type": "string", "subtype": "cell" } }
                ],
                "returns": [
                    { "name": "slope", "schema": { "type": "string", "subtype": "cell" } },
                    { "name": "aspect", "schema": { "type": "string", "subtype": "cell" } }
                ]
            },
            {
                "id": "t.rast.univar",
                "description": "Univariate statistics",
                "parameters": [
                    { "name": "input", "schema": { "type": "string", "subtype": "strds" } }
                ]
            }
        ]))
        .unwrap();

        let mut registry = ProcessRegistry::builtin();
        let builtin = registry.len();
        assert_eq!(registry.import_modules(&modules), 4);
        assert_eq!(registry.len(), builtin + 4);

        for id in [
            "r_slope_aspect",
            "r_slope_aspect_slope",
            "r_slope_aspect_aspect",
            "t_rast_univar",
        ] {
            assert!(registry.contains(id), "missing discovered process {id}");
        }
        assert_eq!(
            registry.describe("t_rast_univar").unwrap().parameters[0].schema,
            raster_cube_schema()
        );

        // Importing again replaces entries without listing them twice.
        registry.import_modules(&modules);
        assert_eq!(registry.len(), builtin + 4);
    }
}
