//! `udf_reduce_time`: reduces the time dimension with a user-defined function.

use serde_json::json;

use super::{dataset_stem, derive_output_name, literal_key};
use crate::chain::{BackendCommand, DataKind, ImportDescriptor};
use crate::engine::CompilationContext;
use crate::error::Result;
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    raster_cube_schema,
};

/// Process identifier.
pub const PROCESS_ID: &str = "udf_reduce_time";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Applies a Python user-defined function to the time series of every \
         pixel of a space-time raster dataset.",
    )
    .with_summary("Reduce the time dimension with a UDF")
    .with_parameter(ParameterDescription::required(
        "imagery",
        "Any openEO process object that returns a space-time raster dataset.",
        raster_cube_schema(),
    ))
    .with_parameter(ParameterDescription::required(
        "python_file_url",
        "URL of the Python file implementing the function.",
        json!({ "type": "string", "format": "uri" }),
    ))
}

/// Compiler of [`PROCESS_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UdfReduceTime;

impl ProcessCompiler for UdfReduceTime {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let input = arguments.primary_single_data()?;
        let python_file_url = arguments.require_str("python_file_url")?;
        let stem = format!("{}_{}", dataset_stem(input), literal_key(python_file_url));
        let output = derive_output_name(&stem, PROCESS_ID);

        let command = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "t.rast.aggr_func")
            .with_input("input", input)
            .with_import(
                "pyfile",
                python_file_url,
                ImportDescriptor::new(DataKind::File, python_file_url),
            )
            .with_output("output", output.as_str());

        Ok(ProcessOutput::single(output, command))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::process::testing::{arguments, context, data, literal};

    #[test]
    fn test_aggr_func() {
        let url = "https://storage.example.com/udf/median.py";
        let args = arguments(
            PROCESS_ID,
            vec![
                ("imagery", data(&["temperature@PERMANENT"])),
                ("python_file_url", literal(json!(url))),
            ],
        );

        let output = UdfReduceTime.compile(&args, &mut context()).unwrap();
        let command = &output.commands[0];
        assert_eq!(command.module, "t.rast.aggr_func");
        assert_eq!(command.input("pyfile"), Some(url));
        assert_eq!(
            command.inputs[1].import_descr.as_ref().map(|d| d.kind),
            Some(DataKind::File)
        );
        assert_eq!(output.output_ids, vec!["temperature_PERMANENT_ed719241_udf_reduce_time"]);
    }

    #[test]
    fn test_missing_url() {
        let args = arguments(PROCESS_ID, vec![("imagery", data(&["temperature@PERMANENT"]))]);
        assert!(matches!(
            UdfReduceTime.compile(&args, &mut context()),
            Err(Error::MissingArgument { argument, .. }) if argument == "python_file_url"
        ));
    }
}
