//! Per-compilation state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Strategy used to generate step identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepIdStrategy {
    /// Random UUID suffixes.
    #[default]
    Random,
    /// Monotonically increasing suffixes starting at 1.
    Sequential,
}

impl StepIdStrategy {
    /// Creates a fresh generator for one compilation.
    pub fn generator(self) -> StepIds {
        match self {
            Self::Random => StepIds::random(),
            Self::Sequential => StepIds::sequential(),
        }
    }
}

/// Generator of step identifiers, unique within one chain.
#[derive(Debug, Clone)]
pub enum StepIds {
    /// Appends a random UUID to every identifier.
    Random,
    /// Appends a counter to every identifier.
    Sequential {
        /// Next counter value.
        next: u64,
    },
}

impl StepIds {
    /// Creates a generator with random suffixes.
    pub const fn random() -> Self {
        Self::Random
    }

    /// Creates a generator with suffixes `1, 2, 3, ...`.
    pub const fn sequential() -> Self {
        Self::Sequential { next: 1 }
    }

    /// Returns the next identifier for a step emitted by `prefix`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        match self {
            Self::Random => format!("{prefix}_{}", Uuid::new_v4().simple()),
            Self::Sequential { next } => {
                let id = format!("{prefix}_{next}");
                *next += 1;
                id
            }
        }
    }
}

/// State threaded through one top-level compilation.
///
/// Records every backend location the graph touches and hands out step
/// identifiers. A context is created per compilation and never shared, so
/// concurrent compilations cannot observe each other's locations.
#[derive(Debug, Clone)]
pub struct CompilationContext {
    locations: BTreeSet<String>,
    step_ids: StepIds,
}

impl CompilationContext {
    /// Creates an empty context.
    pub fn new(step_ids: StepIds) -> Self {
        Self {
            locations: BTreeSet::new(),
            step_ids,
        }
    }

    /// Records that the graph reads data from `location`.
    pub fn add_location(&mut self, location: impl Into<String>) {
        self.locations.insert(location.into());
    }

    /// Returns all recorded locations in name order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(String::as_str)
    }

    /// Returns the number of recorded locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Returns the next step identifier for a step emitted by `process_id`.
    pub fn next_step_id(&mut self, process_id: &str) -> String {
        self.step_ids.next_id(process_id)
    }

    /// Consumes the context and returns the single recorded location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDataReferenced`] if no location was recorded and
    /// [`Error::MultiLocationGraph`] if more than one was.
    pub fn into_location(self) -> Result<String> {
        let mut locations = self.locations.into_iter();
        match (locations.next(), locations.next()) {
            (None, _) => Err(Error::NoDataReferenced),
            (Some(location), None) => Ok(location),
            (Some(first), Some(second)) => Err(Error::MultiLocationGraph {
                locations: [first, second].into_iter().chain(locations).collect(),
            }),
        }
    }
}

impl Default for CompilationContext {
    fn default() -> Self {
        Self::new(StepIds::random())
    }
}
