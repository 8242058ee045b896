//! Backend command types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Kind of data an import or export descriptor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataKind {
    /// A raster layer.
    Raster,
    /// A vector layer.
    Vector,
    /// A plain file.
    File,
}

/// Describes how the backend fetches an input before running a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDescriptor {
    /// Kind of the imported data.
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// URL the data is downloaded from.
    pub source: String,
}

impl ImportDescriptor {
    /// Creates an import descriptor.
    pub fn new(kind: DataKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Describes how the backend exports a step output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDescriptor {
    /// Kind of the exported data.
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Export format, e.g. `GTiff`.
    pub format: String,
}

impl ExportDescriptor {
    /// Creates an export descriptor.
    pub fn new(kind: DataKind, format: impl Into<String>) -> Self {
        Self {
            kind,
            format: format.into(),
        }
    }
}

/// An input parameter of a backend command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInput {
    /// Parameter name.
    pub param: String,
    /// Parameter value.
    pub value: String,
    /// Import performed before the step runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_descr: Option<ImportDescriptor>,
}

/// An output parameter of a backend command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Parameter name.
    pub param: String,
    /// Name of the produced dataset.
    pub value: String,
    /// Export performed after the step runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportDescriptor>,
}

/// One step of a compiled process chain.
///
/// The backend runs steps sequentially in chain order; data flows between
/// steps only through shared dataset names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendCommand {
    /// Step identifier, unique within one chain.
    pub id: String,
    /// Backend module executed by this step.
    pub module: String,
    /// Input parameters in emission order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<CommandInput>,
    /// Output parameters in emission order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<CommandOutput>,
    /// Module flags, e.g. `p`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

impl BackendCommand {
    /// Creates a command without parameters.
    pub fn new(id: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            module: module.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            flags: None,
        }
    }

    /// Appends an input parameter.
    pub fn with_input(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.push(CommandInput {
            param: param.into(),
            value: value.into(),
            import_descr: None,
        });
        self
    }

    /// Appends an input parameter that the backend imports first.
    pub fn with_import(
        mut self,
        param: impl Into<String>,
        value: impl Into<String>,
        import_descr: ImportDescriptor,
    ) -> Self {
        self.inputs.push(CommandInput {
            param: param.into(),
            value: value.into(),
            import_descr: Some(import_descr),
        });
        self
    }

    /// Appends an output parameter.
    pub fn with_output(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.outputs.push(CommandOutput {
            param: param.into(),
            value: value.into(),
            export: None,
        });
        self
    }

    /// Appends an output parameter that the backend exports afterwards.
    pub fn with_export(
        mut self,
        param: impl Into<String>,
        value: impl Into<String>,
        export: ExportDescriptor,
    ) -> Self {
        self.outputs.push(CommandOutput {
            param: param.into(),
            value: value.into(),
            export: Some(export),
        });
        self
    }

    /// Sets the module flags.
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    /// Returns the value of an input parameter.
    pub fn input(&self, param: &str) -> Option<&str> {
        self.inputs
            .iter()
            .find(|input| input.param == param)
            .map(|input| input.value.as_str())
    }

    /// Returns the value of an output parameter.
    pub fn output(&self, param: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|output| output.param == param)
            .map(|output| output.value.as_str())
    }

    /// Returns whether this step reads the given dataset.
    pub fn reads(&self, dataset: &str) -> bool {
        self.inputs
            .iter()
            .any(|input| input.value.split(',').any(|value| value == dataset))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_command_serialization() {
        let command = BackendCommand::new("v_import_1", "v.import")
            .with_import(
                "input",
                "https://example.com/regions.geojson",
                ImportDescriptor::new(DataKind::Vector, "https://example.com/regions.geojson"),
            )
            .with_output("output", "regions");

        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "id": "v_import_1",
                "module": "v.import",
                "inputs": [{
                    "param": "input",
                    "value": "https://example.com/regions.geojson",
                    "import_descr": {
                        "type": "vector",
                        "source": "https://example.com/regions.geojson"
                    }
                }],
                "outputs": [{ "param": "output", "value": "regions" }]
            })
        );
    }

    #[test]
    fn test_flags_and_lookup() {
        let command = BackendCommand::new("g_region_1", "g.region")
            .with_input("raster", "elevation@PERMANENT")
            .with_flags("p");

        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["flags"], "p");
        assert!(value.get("outputs").is_none());
        assert_eq!(command.input("raster"), Some("elevation@PERMANENT"));
        assert_eq!(command.output("output"), None);
    }

    #[test]
    fn test_reads_comma_separated_inputs() {
        let command = BackendCommand::new("mapcalc_1", "t.rast.mapcalc")
            .with_input("inputs", "red@PERMANENT,nir@PERMANENT");

        assert!(command.reads("nir@PERMANENT"));
        assert!(!command.reads("nir"));
    }
}
