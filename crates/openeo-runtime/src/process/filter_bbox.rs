//! `filter_bbox`: restricts the computational region to a bounding box.

use serde_json::json;

use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::Result;
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    raster_cube_schema,
};

/// Process identifier.
pub const PROCESS_ID: &str = "filter_bbox";

/// Bounding box edges and the region parameter each one sets.
const EDGES: [(&str, &str); 4] = [("top", "n"), ("bottom", "s"), ("right", "e"), ("left", "w")];

/// Optional resolutions and the region parameter each one sets.
const RESOLUTIONS: [(&str, &str); 2] = [("ewres", "ewres"), ("nsres", "nsres")];

/// Returns the process description.
pub fn description() -> ProcessDescription {
    let number = json!({ "type": "number" });
    let mut description = ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Drops observations outside of a bounding box by setting the \
         computational region.",
    )
    .with_summary("Spatial filter using a bounding box")
    .with_parameter(ParameterDescription::required(
        "imagery",
        "Any openEO process object that returns raster datasets or space-time raster datasets.",
        raster_cube_schema(),
    ));

    for (name, _) in EDGES {
        description = description.with_parameter(ParameterDescription::required(
            name,
            format!("{name} boundary of the bounding box"),
            number.clone(),
        ));
    }
    for (name, _) in RESOLUTIONS {
        description = description.with_parameter(ParameterDescription::optional(
            name,
            format!("Resolution of the region ({name})"),
            number.clone(),
        ));
    }
    description
}

/// Compiler of [`PROCESS_ID`].
///
/// The region is global backend state, so the datasets pass through
/// unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterBbox;

impl ProcessCompiler for FilterBbox {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let inputs = arguments.primary_data()?.to_vec();
        let mut command = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "g.region");

        for (name, param) in EDGES {
            let value = arguments.require_number(name)?;
            command = command.with_input(param, value.to_string());
        }
        for (name, param) in RESOLUTIONS {
            if let Some(value) = arguments.optional_number(name)? {
                command = command.with_input(param, value.to_string());
            }
        }

        Ok(ProcessOutput::new(inputs, vec![command.with_flags("p")]))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::process::testing::{arguments, context, data, literal};

    #[test]
    fn test_region() {
        let args = arguments(
            PROCESS_ID,
            vec![
                ("imagery", data(&["elevation@PERMANENT"])),
                ("left", literal(json!(630000))),
                ("right", literal(json!(645000))),
                ("top", literal(json!(228500.5))),
                ("bottom", literal(json!("215000"))),
                ("ewres", literal(json!(10))),
            ],
        );

        let output = FilterBbox.compile(&args, &mut context()).unwrap();
        assert_eq!(output.output_ids, vec!["elevation@PERMANENT"]);

        let command = &output.commands[0];
        assert_eq!(command.module, "g.region");
        let params: Vec<_> = command
            .inputs
            .iter()
            .map(|input| (input.param.as_str(), input.value.as_str()))
            .collect();
        assert_eq!(
            params,
            [
                ("n", "228500.5"),
                ("s", "215000"),
                ("e", "645000"),
                ("w", "630000"),
                ("ewres", "10"),
            ]
        );
    }

    #[test]
    fn test_missing_edge() {
        let args = arguments(
            PROCESS_ID,
            vec![
                ("imagery", data(&["elevation@PERMANENT"])),
                ("left", literal(json!(630000))),
                ("right", literal(json!(645000))),
                ("top", literal(json!(228500))),
            ],
        );

        assert!(matches!(
            FilterBbox.compile(&args, &mut context()),
            Err(Error::MissingArgument { argument, .. }) if argument == "bottom"
        ));
    }
}
