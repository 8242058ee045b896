//! Client-facing process descriptions.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::graph::ProcessId;

/// Returns the schema of a raster data cube.
pub fn raster_cube_schema() -> Value {
    json!({ "type": "object", "subtype": "raster-cube" })
}

/// Describes one parameter of a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    /// Parameter name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// JSON schema of accepted values.
    pub schema: Value,
    /// Whether the parameter must be present.
    pub required: bool,
}

impl ParameterDescription {
    /// Creates a required parameter.
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            required: true,
        }
    }

    /// Creates an optional parameter.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, schema)
        }
    }
}

/// Describes the value a process returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDescription {
    /// Human readable description.
    pub description: String,
    /// JSON schema of the returned value.
    pub schema: Value,
}

impl Default for ReturnDescription {
    fn default() -> Self {
        Self {
            description: "Processed EO data.".to_owned(),
            schema: raster_cube_schema(),
        }
    }
}

/// Description of a process as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescription {
    /// Process identifier.
    #[serde(rename = "process_id")]
    pub id: ProcessId,
    /// One line summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Detailed description.
    pub description: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    /// Returned value.
    #[serde(default)]
    pub returns: ReturnDescription,
}

impl ProcessDescription {
    /// Creates a description without parameters.
    pub fn new(id: ProcessId, description: impl Into<String>) -> Self {
        Self {
            id,
            summary: None,
            description: description.into(),
            parameters: Vec::new(),
            returns: ReturnDescription::default(),
        }
    }

    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Appends a parameter.
    pub fn with_parameter(mut self, parameter: ParameterDescription) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the returned value.
    pub fn with_returns(mut self, description: impl Into<String>, schema: Value) -> Self {
        self.returns = ReturnDescription {
            description: description.into(),
            schema,
        };
        self
    }

    /// Returns a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescription> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    /// Returns the names of all required parameters.
    pub fn required_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|parameter| parameter.required)
            .map(|parameter| parameter.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_serialization() {
        let description = ProcessDescription::new(
            ProcessId::new("min_time").unwrap(),
            "Minimum value over time.",
        )
        .with_summary("Minimum time")
        .with_parameter(ParameterDescription::required(
            "imagery",
            "Input data",
            raster_cube_schema(),
        ))
        .with_parameter(ParameterDescription::optional(
            "label",
            "Optional label",
            json!({ "type": "string" }),
        ));

        let value = serde_json::to_value(&description).unwrap();
        assert_eq!(value["process_id"], "min_time");
        assert_eq!(value["parameters"][0]["required"], true);
        assert_eq!(value["returns"]["schema"]["subtype"], "raster-cube");
        assert_eq!(description.required_parameters().collect::<Vec<_>>(), ["imagery"]);
        assert!(description.parameter("label").is_some());
    }
}
