//! `get_data`: loads a dataset and selects its location.

use serde_json::json;

use super::{DataReference, Datatype};
use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::{Error, Result};
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
};

/// Process identifier.
pub const PROCESS_ID: &str = "get_data";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Loads a raster layer, a space-time raster dataset or a vector layer \
         and sets the computational region to it.",
    )
    .with_summary("Load a dataset")
    .with_parameter(ParameterDescription::required(
        "data_id",
        "Identifier of the dataset, <location>.<mapset>.<datatype>.<layer>.",
        json!({ "type": "string" }),
    ))
}

/// Compiler of [`PROCESS_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetData;

impl ProcessCompiler for GetData {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let data_id = arguments.require_str("data_id")?;
        let reference: DataReference = data_id.parse().map_err(|e| {
            Error::compilation(PROCESS_ID, format!("invalid data_id '{data_id}'")).with_source(e)
        })?;

        let dataset = reference.dataset();
        let id = ctx.next_step_id(PROCESS_ID);
        let command = match reference.datatype {
            Datatype::Raster => BackendCommand::new(id, "g.region")
                .with_input("raster", dataset.as_str())
                .with_flags("p"),
            Datatype::Vector => BackendCommand::new(id, "g.region")
                .with_input("vector", dataset.as_str())
                .with_flags("p"),
            Datatype::Strds => BackendCommand::new(id, "t.info").with_input("input", dataset.as_str()),
        };

        ctx.add_location(reference.location);
        Ok(ProcessOutput::single(dataset, command))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::process::testing::{arguments, context, literal};

    #[test]
    fn test_raster() {
        let mut ctx = context();
        let args = arguments(
            PROCESS_ID,
            vec![("data_id", literal(json!("nc.PERMANENT.raster.elevation")))],
        );

        let output = GetData.compile(&args, &mut ctx).unwrap();
        assert_eq!(output.output_ids, vec!["elevation@PERMANENT"]);

        let command = &output.commands[0];
        assert_eq!(command.id, "get_data_1");
        assert_eq!(command.module, "g.region");
        assert_eq!(command.input("raster"), Some("elevation@PERMANENT"));
        assert_eq!(command.flags.as_deref(), Some("p"));
        assert_eq!(ctx.into_location().unwrap(), "nc");
    }

    #[test]
    fn test_strds_and_vector() {
        let mut ctx = context();
        let strds = arguments(
            PROCESS_ID,
            vec![(
                "data_id",
                literal(json!("ECAD.PERMANENT.strds.temperature_mean_1950_2013_yearly_celsius")),
            )],
        );
        let output = GetData.compile(&strds, &mut ctx).unwrap();
        assert_eq!(output.commands[0].module, "t.info");
        assert_eq!(
            output.commands[0].input("input"),
            Some("temperature_mean_1950_2013_yearly_celsius@PERMANENT")
        );

        let vector = arguments(
            PROCESS_ID,
            vec![("data_id", literal(json!("ECAD.PERMANENT.vector.boundary_county")))],
        );
        let output = GetData.compile(&vector, &mut ctx).unwrap();
        assert_eq!(output.commands[0].input("vector"), Some("boundary_county@PERMANENT"));
        assert_eq!(ctx.location_count(), 1);
    }

    #[test]
    fn test_errors() {
        let mut ctx = context();
        assert!(matches!(
            GetData.compile(&arguments(PROCESS_ID, vec![]), &mut ctx),
            Err(Error::MissingArgument { argument, .. }) if argument == "data_id"
        ));

        let args = arguments(PROCESS_ID, vec![("data_id", literal(json!("elevation")))]);
        assert!(matches!(
            GetData.compile(&args, &mut ctx),
            Err(Error::Compilation { source: Some(_), .. })
        ));
        assert_eq!(ctx.location_count(), 0);
    }
}
