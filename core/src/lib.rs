//! Operation registry and pipeline-description engine.
//!
//! Independent engines declare which media operations and input/output
//! types they support ([`EngineDescriptor`]); the [`Registry`] keeps the
//! capability matrix, validates operation calls against it, and builds
//! per-call [`Pipeline`]s from structured operation lists or from the
//! compact query mini-language (see [`query`]).
//!
//! Executing operations is out of scope: engines are capability
//! descriptors, and a pipeline here is a validated description, not a
//! running process.

pub mod config;
pub mod engine;
pub mod error;
pub mod operation;
pub mod pipeline;
pub mod query;
pub mod registry;

pub use config::{AllowFn, PipelineOptions, RegistryOptions};
pub use engine::{EngineDescriptor, ValidateFn};
pub use error::RegistryError;
pub use operation::{ArgValue, Operation};
pub use pipeline::{Pipeline, PipelineSource};
pub use query::ParsedQuery;
pub use registry::Registry;
