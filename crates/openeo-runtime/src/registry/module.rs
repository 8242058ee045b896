//! Backend modules discovered from the actinia module catalog.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::compiler::{ProcessArguments, ProcessCompiler, ProcessOutput, ResolvedArgument};
use super::description::{ParameterDescription, ProcessDescription, raster_cube_schema};
use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::{Error, Result};
use crate::graph::ProcessId;
use crate::process::derive_joined_output_name;

/// Schema subtypes that denote raster data on the backend.
const RASTER_SUBTYPES: [&str; 2] = ["cell", "strds"];

/// JSON schema of a module parameter as reported by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSchema {
    /// Base JSON type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Backend specific subtype, e.g. `cell` or `strds`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Remaining schema keywords.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleSchema {
    /// Returns whether the schema describes raster data.
    pub fn is_raster(&self) -> bool {
        self.subtype
            .as_deref()
            .is_some_and(|subtype| RASTER_SUBTYPES.contains(&subtype))
    }

    /// Converts the schema into the form listed to clients.
    ///
    /// Raster subtypes are reported as the generic raster cube type.
    pub fn to_client_schema(&self) -> Value {
        if self.is_raster() {
            return raster_cube_schema();
        }
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A parameter or output declared by a backend module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleParameter {
    /// Parameter name.
    pub name: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Whether the parameter may be omitted.
    #[serde(default)]
    pub optional: bool,
    /// Accepted values.
    #[serde(default)]
    pub schema: ModuleSchema,
}

impl ModuleParameter {
    /// Converts the parameter into its client-facing description.
    pub fn to_description(&self) -> ParameterDescription {
        ParameterDescription {
            name: self.name.clone(),
            description: self.description.clone(),
            schema: self.schema.to_client_schema(),
            required: !self.optional,
        }
    }
}

/// A module offered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendModule {
    /// Module identifier, e.g. `r.slope.aspect`.
    pub id: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Module categories.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Input parameters.
    #[serde(default)]
    pub parameters: Vec<ModuleParameter>,
    /// Named outputs.
    #[serde(default)]
    pub returns: Vec<ModuleParameter>,
}

impl BackendModule {
    /// Creates a module without parameters or outputs.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            categories: Vec::new(),
            parameters: Vec::new(),
            returns: Vec::new(),
        }
    }

    /// Appends an input parameter.
    pub fn with_parameter(mut self, parameter: ModuleParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends an output.
    pub fn with_return(mut self, output: ModuleParameter) -> Self {
        self.returns.push(output);
        self
    }

    /// Returns the process id the module is registered under.
    pub fn process_id(&self) -> ProcessId {
        ProcessId::sanitize(&self.id)
    }

    /// Returns the process id of the pseudo-process selecting `output`.
    pub fn output_process_id(&self, output: &ModuleParameter) -> ProcessId {
        ProcessId::sanitize(&format!("{}_{}", self.id, output.name))
    }

    /// Returns whether the module gets one pseudo-process per output.
    pub fn has_multiple_outputs(&self) -> bool {
        self.returns.len() > 1
    }

    /// Describes the process running the module with all its outputs.
    pub fn to_description(&self) -> ProcessDescription {
        self.describe(self.process_id(), &self.returns)
    }

    /// Describes the pseudo-process running the module for one output.
    pub fn to_output_description(&self, output: &ModuleParameter) -> ProcessDescription {
        let mut description = self.describe(
            self.output_process_id(output),
            std::slice::from_ref(output),
        );
        description.summary = Some(format!("{} ({})", self.id, output.name));
        description
    }

    fn describe(&self, id: ProcessId, outputs: &[ModuleParameter]) -> ProcessDescription {
        let mut description = ProcessDescription::new(id, self.description.clone())
            .with_summary(self.id.clone());
        description.parameters = self
            .parameters
            .iter()
            .map(ModuleParameter::to_description)
            .collect();
        if let [output] = outputs {
            description = description
                .with_returns(output.description.clone(), output.schema.to_client_schema());
        }
        description
    }
}

/// Compiles an invocation of a discovered backend module.
///
/// Emits exactly one command running the module. Literal arguments become
/// input parameters (strings verbatim, other values as compact JSON) and
/// data arguments become input parameters listing the upstream datasets.
#[derive(Debug, Clone)]
pub struct BackendModuleCompiler {
    module_id: String,
    outputs: Vec<String>,
}

impl BackendModuleCompiler {
    /// Creates a compiler running `module_id` and naming `outputs`.
    pub fn new(module_id: impl Into<String>, outputs: Vec<String>) -> Self {
        Self {
            module_id: module_id.into(),
            outputs,
        }
    }

    /// Creates the compiler for a module with all its outputs.
    pub fn for_module(module: &BackendModule) -> Self {
        Self::new(
            module.id.clone(),
            module.returns.iter().map(|output| output.name.clone()).collect(),
        )
    }

    /// Creates the compiler for the pseudo-process selecting one output.
    pub fn for_output(module: &BackendModule, output: &ModuleParameter) -> Self {
        Self::new(module.id.clone(), vec![output.name.clone()])
    }

    /// Returns the executed module id.
    pub fn module_id(&self) -> &str {
        &self.module_id
    }
}

impl ProcessCompiler for BackendModuleCompiler {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let process_id = arguments.process_id().as_str();
        let step_id = ctx.next_step_id(process_id);
        let mut command = BackendCommand::new(step_id.clone(), self.module_id.as_str());
        let mut upstream = Vec::new();

        for (name, argument) in arguments.iter() {
            match argument {
                ResolvedArgument::Literal(Value::Null) => {}
                ResolvedArgument::Literal(Value::String(value)) => {
                    command = command.with_input(name, value.as_str());
                }
                ResolvedArgument::Literal(value) => {
                    command = command.with_input(name, value.to_string());
                }
                ResolvedArgument::Data(ids) => {
                    command = command.with_input(name, ids.join(","));
                    upstream.extend(ids.iter().cloned());
                }
            }
        }

        if self.outputs.is_empty() {
            if upstream.is_empty() {
                return Err(Error::compilation(
                    process_id,
                    format!(
                        "module '{}' declares no outputs and receives no data",
                        self.module_id
                    ),
                ));
            }
            return Ok(ProcessOutput::new(upstream, vec![command]));
        }

        let base = if upstream.is_empty() {
            step_id
        } else {
            derive_joined_output_name(upstream.iter().map(String::as_str), process_id)
        };
        let mut output_ids = Vec::with_capacity(self.outputs.len());
        for output in &self.outputs {
            let value = if self.outputs.len() == 1 {
                base.clone()
            } else {
                format!("{base}_{output}")
            };
            command = command.with_output(output.as_str(), value.as_str());
            output_ids.push(value);
        }

        Ok(ProcessOutput::new(output_ids, vec![command]))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::engine::StepIds;

    fn slope_aspect() -> BackendModule {
        serde_json::from_value(json!({
            "id": "r.slope.aspect",
            "description": "Generates raster maps of slope and aspect.",
            "categories": ["raster", "grass-module"],
            "parameters": [
                {
                    "name": "elevation",
                    "description": "Name of input elevation raster map",
                    "optional": false,
                    "schema": { "type": "string", "subtype": "cell" }
                },
                {
                    "name": "precision",
                    "description": "Type of output aspect and slope maps",
                    "optional": true,
                    "schema": { "type": "string", "enum": ["FCELL", "CELL", "DCELL"] }
                }
            ],
            "returns": [
                { "name": "slope", "description": "Output slope raster map", "schema": { "type": "string", "subtype": "cell" } },
                { "name": "aspect", "description": "Output aspect raster map", "schema": { "type": "string", "subtype": "cell" } }
            ]
        }))
        .unwrap()
    }

    fn arguments(process_id: &str, values: Vec<(&str, ResolvedArgument)>) -> ProcessArguments {
        ProcessArguments::new(
            ProcessId::new(process_id).unwrap(),
            values
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_module_description() {
        let module = slope_aspect();
        assert_eq!(module.process_id(), "r_slope_aspect");
        assert!(module.has_multiple_outputs());

        let description = module.to_description();
        let elevation = description.parameter("elevation").unwrap();
        assert!(elevation.required);
        assert_eq!(elevation.schema, raster_cube_schema());

        let precision = description.parameter("precision").unwrap();
        assert!(!precision.required);
        assert_eq!(precision.schema["enum"][1], "CELL");

        let slope = module.to_output_description(&module.returns[0]);
        assert_eq!(slope.id, "r_slope_aspect_slope");
        assert_eq!(slope.returns.schema, raster_cube_schema());
    }

    #[test]
    fn test_compile_all_outputs() {
        let module = slope_aspect();
        let compiler = BackendModuleCompiler::for_module(&module);
        let args = arguments(
            "r_slope_aspect",
            vec![
                (
                    "elevation",
                    ResolvedArgument::Data(vec!["elevation@PERMANENT".into()]),
                ),
                ("zscale", ResolvedArgument::Literal(json!(1.5))),
                ("precision", ResolvedArgument::Literal(json!("FCELL"))),
                ("format", ResolvedArgument::Literal(Value::Null)),
            ],
        );

        let mut ctx = CompilationContext::new(StepIds::sequential());
        let output = compiler.compile(&args, &mut ctx).unwrap();
        let command = &output.commands[0];

        assert_eq!(command.id, "r_slope_aspect_1");
        assert_eq!(command.module, "r.slope.aspect");
        assert_eq!(command.input("elevation"), Some("elevation@PERMANENT"));
        assert_eq!(command.input("zscale"), Some("1.5"));
        assert_eq!(command.input("precision"), Some("FCELL"));
        assert_eq!(command.input("format"), None);
        assert_eq!(
            output.output_ids,
            vec![
                "elevation_PERMANENT_r_slope_aspect_slope",
                "elevation_PERMANENT_r_slope_aspect_aspect"
            ]
        );
        assert_eq!(
            command.output("aspect"),
            Some("elevation_PERMANENT_r_slope_aspect_aspect")
        );
    }

    #[test]
    fn test_compile_single_output() {
        let module = slope_aspect();
        let compiler = BackendModuleCompiler::for_output(&module, &module.returns[0]);
        let args = arguments(
            "r_slope_aspect_slope",
            vec![(
                "elevation",
                ResolvedArgument::Data(vec!["elevation@PERMANENT".into()]),
            )],
        );

        let mut ctx = CompilationContext::new(StepIds::sequential());
        let output = compiler.compile(&args, &mut ctx).unwrap();
        assert_eq!(output.output_ids, vec!["elevation_PERMANENT_r_slope_aspect_slope"]);
        assert_eq!(output.commands[0].outputs.len(), 1);
        assert_eq!(output.commands[0].module, "r.slope.aspect");
    }

    #[test]
    fn test_compile_without_outputs() {
        let compiler = BackendModuleCompiler::new("r.colors", Vec::new());
        let mut ctx = CompilationContext::new(StepIds::sequential());

        let args = arguments(
            "r_colors",
            vec![
                ("color", ResolvedArgument::Literal(json!("elevation"))),
                ("map", ResolvedArgument::Data(vec!["elevation@PERMANENT".into()])),
            ],
        );
        let output = compiler.compile(&args, &mut ctx).unwrap();
        assert_eq!(output.output_ids, vec!["elevation@PERMANENT"]);
        assert_eq!(output.commands[0].input("color"), Some("elevation"));

        let args = arguments("r_colors", vec![]);
        assert!(matches!(
            compiler.compile(&args, &mut ctx),
            Err(Error::Compilation { .. })
        ));
    }
}
