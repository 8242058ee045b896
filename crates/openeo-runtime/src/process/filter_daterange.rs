//! `filter_daterange`: extracts the maps of a time range.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use serde_json::json;

use super::{dataset_stem, derive_output_name, literal_key};
use crate::chain::BackendCommand;
use crate::engine::CompilationContext;
use crate::error::{Error, Result};
use crate::graph::ProcessId;
use crate::registry::{
    ParameterDescription, ProcessArguments, ProcessCompiler, ProcessDescription, ProcessOutput,
    raster_cube_schema,
};

/// Process identifier.
pub const PROCESS_ID: &str = "filter_daterange";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    let date = json!({ "type": "string", "format": "date-time" });
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Drops observations from a space-time raster dataset that are outside \
         of the given time range.",
    )
    .with_summary("Temporal filter based on a date range")
    .with_parameter(ParameterDescription::required(
        "imagery",
        "Any openEO process object that returns a space-time raster dataset.",
        raster_cube_schema(),
    ))
    .with_parameter(ParameterDescription::required(
        "from",
        "Start date/time, inclusive.",
        date.clone(),
    ))
    .with_parameter(ParameterDescription::required(
        "to",
        "End date/time, inclusive.",
        date,
    ))
}

/// Compiler of [`PROCESS_ID`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterDaterange;

impl ProcessCompiler for FilterDaterange {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let input = arguments.primary_single_data()?;
        let from = require_instant(arguments, "from")?;
        let to = require_instant(arguments, "to")?;

        let stem = format!("{}_{}", dataset_stem(input), literal_key(&format!("{from}/{to}")));
        let output = derive_output_name(&stem, PROCESS_ID);
        let command = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "t.rast.extract")
            .with_input("input", input)
            .with_input(
                "where",
                format!("start_time >= '{from}' AND end_time <= '{to}'"),
            )
            .with_output("output", output.as_str());

        Ok(ProcessOutput::single(output, command))
    }
}

/// Returns a bound that parses as an ISO 8601 date, date-time or timestamp.
///
/// Only validated bounds reach the `where` condition of the backend.
fn require_instant<'a>(arguments: &'a ProcessArguments, name: &str) -> Result<&'a str> {
    let value = arguments.require_str(name)?.trim();
    let valid = value.parse::<Date>().is_ok()
        || value.parse::<DateTime>().is_ok()
        || value.parse::<Timestamp>().is_ok();

    if !valid {
        return Err(Error::compilation(
            PROCESS_ID,
            format!("argument '{name}' must be an ISO 8601 date or date-time"),
        ));
    }
    Ok(value)
}
