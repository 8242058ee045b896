//! `min_time`: per-pixel minimum over time.

use super::derive_output_name;
use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::Result;
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    raster_cube_schema,
};

/// Process identifier.
pub const PROCESS_ID: &str = "min_time";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Finds the minimum value of time series for all bands of the input dataset.",
    )
    .with_summary("Calculates minimum values of time series")
    .with_parameter(ParameterDescription::required(
        "imagery",
        "Any openEO process object that returns a space-time raster dataset.",
        raster_cube_schema(),
    ))
}

/// Compiler of [`PROCESS_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MinTime;

impl ProcessCompiler for MinTime {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let input = arguments.primary_single_data()?;
        let output = derive_output_name(input, PROCESS_ID);

        let command = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "t.rast.series")
            .with_input("input", input)
            .with_input("method", "minimum")
            .with_output("output", output.as_str());

        Ok(ProcessOutput::single(output, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::testing::{arguments, context, data};

    #[test]
    fn test_series() {
        let args = arguments(PROCESS_ID, vec![("imagery", data(&["temperature@PERMANENT"]))]);

        let output = MinTime.compile(&args, &mut context()).unwrap();
        let command = &output.commands[0];
        assert_eq!(command.id, "min_time_1");
        assert_eq!(command.module, "t.rast.series");
        assert_eq!(command.input("method"), Some("minimum"));
        assert_eq!(output.output_ids, vec!["temperature_PERMANENT_min_time"]);
    }
}
