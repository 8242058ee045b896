//! Compiler configuration.

use derive_builder::Builder;

use super::StepIdStrategy;

/// Default maximum nesting depth of a process graph.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for the graph compiler.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CompilerConfig {
    /// Maximum nesting depth of a process graph.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    pub max_depth: usize,

    /// How step identifiers are generated.
    #[builder(default)]
    pub step_ids: StepIdStrategy,
}

impl CompilerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max_depth) = self.max_depth
            && max_depth == 0
        {
            return Err("max_depth must be at least 1".into());
        }
        Ok(())
    }
}

impl CompilerConfig {
    /// Returns a builder for the compiler configuration.
    pub fn builder() -> CompilerConfigBuilder {
        CompilerConfigBuilder::default()
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            step_ids: StepIdStrategy::default(),
        }
    }
}
