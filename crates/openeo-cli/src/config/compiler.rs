//! Graph compiler configuration.

use anyhow::{Context, Result as AnyhowResult};
use clap::Args;
use openeo_runtime::CompilerConfig;
use openeo_runtime::engine::{DEFAULT_MAX_DEPTH, StepIdStrategy};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Graph compiler configuration.
///
/// # Environment Variables
///
/// - `OPENEO_MAX_DEPTH` - Maximum nesting depth of a process graph (default: 64)
/// - `OPENEO_SEQUENTIAL_IDS` - Number steps `1, 2, 3, ...` instead of using random ids
/// - `OPENEO_DISCOVER_MODULES` - Register the modules the backend offers as processes
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct CompilerArgs {
    /// Maximum nesting depth of a process graph.
    #[arg(long, env = "OPENEO_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Number steps sequentially instead of using random step ids.
    ///
    /// Makes compiling the same graph twice produce identical chains.
    #[arg(long, env = "OPENEO_SEQUENTIAL_IDS")]
    #[serde(default)]
    pub sequential_ids: bool,

    /// Register the modules listed by the backend as additional processes.
    #[arg(long, env = "OPENEO_DISCOVER_MODULES")]
    #[serde(default)]
    pub discover: bool,
}

impl CompilerArgs {
    /// Returns the step id strategy selected on the command line.
    pub fn step_ids(&self) -> StepIdStrategy {
        if self.sequential_ids {
            StepIdStrategy::Sequential
        } else {
            StepIdStrategy::Random
        }
    }

    /// Builds the compiler configuration.
    pub fn to_compiler_config(&self) -> AnyhowResult<CompilerConfig> {
        CompilerConfig::builder()
            .max_depth(self.max_depth)
            .step_ids(self.step_ids())
            .build()
            .context("invalid compiler configuration")
    }

    /// Logs the configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_depth = self.max_depth,
            sequential_ids = self.sequential_ids,
            discover = self.discover,
            "Compiler configuration"
        );
    }
}

impl Default for CompilerArgs {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sequential_ids: false,
            discover: false,
        }
    }
}
