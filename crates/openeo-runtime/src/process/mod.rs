//! Built-in processes.
//!
//! Every built-in lives in its own module exposing a `PROCESS_ID`, a
//! `description()` and a unit compiler type. [`register_builtins`] adds all
//! of them to a [`ProcessRegistry`].

mod data_id;
pub mod filter_bbox;
pub mod filter_daterange;
pub mod get_data;
pub mod min_time;
pub mod ndvi;
pub mod raster_exporter;
pub mod udf_reduce_time;
pub mod zonal_statistics;

pub use data_id::{DataReference, Datatype, ParseDataReferenceError};

use uuid::Uuid;

use crate::registry::ProcessRegistry;

/// Registers every built-in process.
pub fn register_builtins(registry: &mut ProcessRegistry) {
    registry.register(get_data::description(), get_data::GetData);
    registry.register(filter_bbox::description(), filter_bbox::FilterBbox);
    registry.register(
        filter_daterange::description(),
        filter_daterange::FilterDaterange,
    );
    registry.register(min_time::description(), min_time::MinTime);
    registry.register(ndvi::description(), ndvi::Ndvi);
    registry.register(
        raster_exporter::description(),
        raster_exporter::RasterExporter,
    );
    registry.register(
        zonal_statistics::description(),
        zonal_statistics::ZonalStatistics,
    );
    registry.register(
        udf_reduce_time::description(),
        udf_reduce_time::UdfReduceTime,
    );
}

/// Returns a dataset name usable inside derived names.
///
/// `<layer>@<mapset>` becomes `<layer>_<mapset>`, so layers of the same
/// name in different mapsets stay distinct. Derived names pass through.
pub fn dataset_stem(dataset: &str) -> String {
    match dataset.split_once('@') {
        Some((layer, mapset)) => format!("{layer}_{mapset}"),
        None => dataset.to_owned(),
    }
}

/// Derives the name of a dataset produced by `process_id` from `input`.
pub fn derive_output_name(input: &str, process_id: &str) -> String {
    format!("{}_{process_id}", dataset_stem(input))
}

/// Derives the name of a dataset produced by `process_id` from several inputs.
pub fn derive_joined_output_name<'a>(
    inputs: impl IntoIterator<Item = &'a str>,
    process_id: &str,
) -> String {
    let mut name = String::new();
    for input in inputs {
        name.push_str(&dataset_stem(input));
        name.push('_');
    }
    name.push_str(process_id);
    name
}

/// Returns a short stable key for literal arguments that shape an output.
///
/// Appended to derived names when the upstream dataset alone does not
/// identify the result.
pub fn literal_key(literal: &str) -> String {
    let mut key = Uuid::new_v5(&Uuid::NAMESPACE_URL, literal.as_bytes())
        .simple()
        .to_string();
    key.truncate(LITERAL_KEY_LEN);
    key
}

const LITERAL_KEY_LEN: usize = 8;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_stem() {
        assert_eq!(dataset_stem("elevation@PERMANENT"), "elevation_PERMANENT");
        assert_eq!(dataset_stem("elevation_min_time"), "elevation_min_time");
    }

    #[test]
    fn test_derive_output_name() {
        assert_eq!(
            derive_output_name("elevation@PERMANENT", "filter_daterange"),
            "elevation_PERMANENT_filter_daterange"
        );
        assert_ne!(
            derive_output_name("temperature@PERMANENT", "min_time"),
            derive_output_name("temperature@user1", "min_time")
        );
        assert_eq!(
            derive_joined_output_name(["B04@sentinel", "B08@sentinel"], "ndvi"),
            "B04_sentinel_B08_sentinel_ndvi"
        );
    }

    #[test]
    fn test_literal_key() {
        let key = literal_key("https://storage.example.com/regions/germany.geojson");
        assert_eq!(key, "6421a268");
        assert_eq!(
            key,
            literal_key("https://storage.example.com/regions/germany.geojson")
        );
        assert_ne!(
            key,
            literal_key("https://storage.example.com/regions/france.geojson")
        );
    }

    #[test]
    fn test_descriptions_match_ids() {
        let registry = ProcessRegistry::builtin();
        for description in registry.describe_all() {
            assert!(description.summary.is_some(), "{} has no summary", description.id);
            assert!(
                description.required_parameters().count() > 0,
                "{} has no required parameters",
                description.id
            );
        }
    }
}
