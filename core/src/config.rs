use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::operation::ArgValue;

/// External gate consulted by the query parser after engine validation.
pub type AllowFn = dyn Fn(&str, &[ArgValue]) -> bool + Send + Sync;

/// Options accepted at registry construction. Per-engine enable/disable
/// flags live in `engines`, keyed by engine name.
#[derive(Clone, Default)]
pub struct RegistryOptions {
    pub default_engine_name: Option<String>,
    pub allow_operation: Option<Arc<AllowFn>>,
    pub max_input_pixels: Option<u64>,
    pub max_output_pixels: Option<u64>,
    pub root: Option<PathBuf>,
    pub engines: HashMap<String, bool>,
}

impl fmt::Debug for RegistryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryOptions")
            .field("default_engine_name", &self.default_engine_name)
            .field("has_allow_operation", &self.allow_operation.is_some())
            .field("max_input_pixels", &self.max_input_pixels)
            .field("max_output_pixels", &self.max_output_pixels)
            .field("root", &self.root)
            .field("engines", &self.engines)
            .finish()
    }
}

/// Frozen option snapshot a pipeline carries, taken at creation time.
/// Pipelines never observe later registry changes.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub default_engine_name: Option<String>,
    pub max_input_pixels: Option<u64>,
    pub max_output_pixels: Option<u64>,
    pub root: Option<PathBuf>,
    pub engines: HashMap<String, bool>,
    /// Option keys the owning registry recognized at snapshot time. Grows
    /// by one entry per registered engine.
    pub supported_options: Vec<String>,
}
