//! Backend dataset references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Kind of dataset stored on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Datatype {
    /// A single raster layer.
    Raster,
    /// A space-time raster dataset.
    Strds,
    /// A vector layer.
    Vector,
}

/// Error returned when parsing a [`DataReference`] fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDataReferenceError {
    /// The identifier does not have four non-empty components.
    #[error("expected <location>.<mapset>.<datatype>.<layer>")]
    Shape,
    /// The datatype component is not known.
    #[error("unknown datatype '{0}', expected raster, strds or vector")]
    Datatype(String),
}

/// Reference to a dataset, written `<location>.<mapset>.<datatype>.<layer>`.
///
/// The layer is everything after the third dot and may itself contain dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataReference {
    /// Backend location.
    pub location: String,
    /// Mapset within the location.
    pub mapset: String,
    /// Kind of dataset.
    pub datatype: Datatype,
    /// Layer name within the mapset.
    pub layer: String,
}

impl DataReference {
    /// Returns the backend dataset name, `<layer>@<mapset>`.
    pub fn dataset(&self) -> String {
        format!("{}@{}", self.layer, self.mapset)
    }
}

impl FromStr for DataReference {
    type Err = ParseDataReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(4, '.').collect();
        let [location, mapset, datatype, layer] = parts.as_slice() else {
            return Err(ParseDataReferenceError::Shape);
        };
        if [location, mapset, datatype, layer].iter().any(|part| part.is_empty()) {
            return Err(ParseDataReferenceError::Shape);
        }

        let datatype = Datatype::from_str(datatype)
            .map_err(|_| ParseDataReferenceError::Datatype((*datatype).to_owned()))?;

        Ok(Self {
            location: (*location).to_owned(),
            mapset: (*mapset).to_owned(),
            datatype,
            layer: (*layer).to_owned(),
        })
    }
}

impl fmt::Display for DataReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.location, self.mapset, self.datatype, self.layer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let reference: DataReference = "nc.PERMANENT.raster.elevation".parse().unwrap();
        assert_eq!(reference.location, "nc");
        assert_eq!(reference.mapset, "PERMANENT");
        assert_eq!(reference.datatype, Datatype::Raster);
        assert_eq!(reference.dataset(), "elevation@PERMANENT");
        assert_eq!(reference.to_string(), "nc.PERMANENT.raster.elevation");
    }

    #[test]
    fn test_layer_keeps_dots() {
        let reference: DataReference = "LL.sentinel.strds.S2A.B04".parse().unwrap();
        assert_eq!(reference.datatype, Datatype::Strds);
        assert_eq!(reference.layer, "S2A.B04");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "nc.PERMANENT.elevation".parse::<DataReference>(),
            Err(ParseDataReferenceError::Shape)
        );
        assert_eq!(
            "nc..raster.elevation".parse::<DataReference>(),
            Err(ParseDataReferenceError::Shape)
        );
        assert_eq!(
            "nc.PERMANENT.cell.elevation".parse::<DataReference>(),
            Err(ParseDataReferenceError::Datatype("cell".into()))
        );
    }
}
