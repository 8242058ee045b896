//! `raster_exporter`: exports datasets as GeoTIFF.

use crate::chain::{BackendCommand, DataKind, ExportDescriptor};
use crate::engine::CompilationContext;
use crate::error::Result;
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    raster_cube_schema,
};

/// Process identifier.
pub const PROCESS_ID: &str = "raster_exporter";

/// Format raster outputs are exported in.
const EXPORT_FORMAT: &str = "GTiff";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Exports every input raster layer as a GeoTIFF file.",
    )
    .with_summary("Export raster layers")
    .with_parameter(ParameterDescription::required(
        "imagery",
        "One or more openEO process objects that return raster layers.",
        raster_cube_schema(),
    ))
}

/// Compiler of [`PROCESS_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterExporter;

impl ProcessCompiler for RasterExporter {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let inputs = arguments.primary_data()?;
        let commands = inputs
            .iter()
            .map(|input| {
                BackendCommand::new(ctx.next_step_id(PROCESS_ID), "exporter").with_export(
                    "map",
                    input.as_str(),
                    ExportDescriptor::new(DataKind::Raster, EXPORT_FORMAT),
                )
            })
            .collect();

        Ok(ProcessOutput::new(inputs.to_vec(), commands))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::process::testing::{arguments, context, data};

    #[test]
    fn test_export_every_input() {
        let args = arguments(
            PROCESS_ID,
            vec![("imagery", data(&["elevation@PERMANENT", "slope_min_time"]))],
        );

        let output = RasterExporter.compile(&args, &mut context()).unwrap();
        assert_eq!(output.output_ids, vec!["elevation@PERMANENT", "slope_min_time"]);
        assert_eq!(output.commands.len(), 2);
        assert_eq!(output.commands[1].id, "raster_exporter_2");
        assert_eq!(
            serde_json::to_value(&output.commands[0]).unwrap(),
            json!({
                "id": "raster_exporter_1",
                "module": "exporter",
                "outputs": [{
                    "param": "map",
                    "value": "elevation@PERMANENT",
                    "export": { "type": "raster", "format": "GTiff" }
                }]
            })
        );
    }
}
