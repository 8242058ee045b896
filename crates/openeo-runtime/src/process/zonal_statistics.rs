//! `zonal_statistics`: univariate statistics inside polygons.

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
pub const PROCESS_ID: &str = "zonal_statistics";

/// Returns the process description.
pub fn description() -> ProcessDescription {
    ProcessDescription::new(
        ProcessId::sanitize(PROCESS_ID),
        "Computes univariate statistics of a space-time raster dataset inside \
         the polygons of a vector file.",
    )
    .with_summary("Calculates zonal statistics")
    .with_parameter(ParameterDescription::required(
        "imagery",
        "Any openEO process object that returns a space-time raster dataset.",
        raster_cube_schema(),
    ))
    .with_parameter(ParameterDescription::required(
        "regions",
        "URL of a vector file with the polygons to compute statistics for.",
        json!({ "type": "string", "format": "uri" }),
    ))
    .with_returns(
        "Univariate statistics per map of the dataset.",
        json!({ "type": "object" }),
    )
}

/// Compiler of [`PROCESS_ID`].
///
/// Emits four steps: import the polygons, align the region to them, mask
/// the raster with them and compute the statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZonalStatistics;

impl ProcessCompiler for ZonalStatistics {
    fn compile(
        &self,
        arguments: &ProcessArguments,
        ctx: &mut CompilationContext,
    ) -> Result<ProcessOutput> {
        let input = arguments.primary_single_data()?;
        let regions_url = arguments.require_str("regions")?;
        let stem = format!("{}_{}", dataset_stem(input), literal_key(regions_url));
        let regions = format!("{stem}_{PROCESS_ID}_regions");
        let output = derive_output_name(&stem, PROCESS_ID);

        let import = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "v.import")
            .with_import(
                "input",
                regions_url,
                ImportDescriptor::new(DataKind::Vector, regions_url),
            )
            .with_output("output", regions.as_str());
        let region = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "g.region")
            .with_input("vector", regions.as_str())
            .with_flags("p");
        let mask = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "r.mask")
            .with_input("vector", regions.as_str());
        let statistics = BackendCommand::new(ctx.next_step_id(PROCESS_ID), "t.rast.univar")
            .with_input("input", input)
            .with_output("output", output.as_str());

        Ok(ProcessOutput::new(
            vec![output],
            vec![import, region, mask, statistics],
        ))
    }
}
