//! `ndvi`: normalized difference vegetation index.

use super::derive_joined_output_name;
use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::Result;
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    raster_cube_schema,
};

/// Process identifier.
pub const PROCESS_ID: &str = "ndvi";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Computes the normalized difference vegetation index from a red and a \
         near-infrared space-time raster dataset.",
    )
    .with_summary("Normalized difference vegetation index")
    .with_parameter(ParameterDescription::required(
        "red",
        "Space-time raster dataset of the red band.",
        raster_cube_schema(),
    ))
    .with_parameter(ParameterDescription::required(
        "nir",
        "Space-time raster dataset of the near-infrared band.",
        raster_cube_schema(),
    ))
}

/// Compiler of [`PROCESS_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ndvi;

impl ProcessCompiler for Ndvi {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let red = arguments.require_single_data("red")?;
        let nir = arguments.require_single_data("nir")?;
        let output = derive_joined_output_name([red, nir], PROCESS_ID);

        let command = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "t.rast.mapcalc")
            .with_input("inputs", format!("{red},{nir}"))
            .with_input(
                "expression",
                format!("{output} = float(({nir} - {red})/({nir} + {red}))"),
            )
            .with_input("basename", PROCESS_ID)
            .with_output("output", output.as_str());

        Ok(ProcessOutput::single(output, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::process::testing::{arguments, context, data};

    #[test]
    fn test_mapcalc() {
        let args = arguments(
            PROCESS_ID,
            vec![
                ("red", data(&["S2_B04@sentinel"])),
                ("nir", data(&["S2_B08@sentinel"])),
            ],
        );

        let output = Ndvi.compile(&args, &mut context()).unwrap();
        let command = &output.commands[0];
        assert_eq!(command.module, "t.rast.mapcalc");
        assert_eq!(command.input("inputs"), Some("S2_B04@sentinel,S2_B08@sentinel"));
        assert_eq!(
            command.input("expression"),
            Some(
                "S2_B04_sentinel_S2_B08_sentinel_ndvi = \
                 float((S2_B08@sentinel - S2_B04@sentinel)/(S2_B08@sentinel + S2_B04@sentinel))"
            )
        );
        assert_eq!(command.input("basename"), Some("ndvi"));
        assert_eq!(output.output_ids, vec!["S2_B04_sentinel_S2_B08_sentinel_ndvi"]);
    }

    #[test]
    fn test_output_depends_on_both_bands() {
        let compile = |nir: &str| {
            let args = arguments(
                PROCESS_ID,
                vec![("red", data(&["S2_B04@sentinel"])), ("nir", data(&[nir]))],
            );
            Ndvi.compile(&args, &mut context()).unwrap().output_ids
        };

        assert_ne!(compile("S2_B08@sentinel"), compile("S2_B8A@sentinel"));
    }

    #[test]
    fn test_missing_band() {
        let args = arguments(PROCESS_ID, vec![("red", data(&["S2_B04@sentinel"]))]);
        assert!(matches!(
            Ndvi.compile(&args, &mut context()),
            Err(Error::MissingArgument { argument, .. }) if argument == "nir"
        ));
    }
}
