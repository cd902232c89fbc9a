use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::config::{PipelineOptions, RegistryOptions};
use crate::engine::EngineDescriptor;
use crate::error::RegistryError;
use crate::operation::{ArgValue, Operation};
use crate::pipeline::{Pipeline, PipelineSource};
use crate::query::{parse_query, ParsedQuery};

/// Option keys every registry recognizes before any engine registers.
/// Wire names are stable, so these stay camelCase.
const BASE_SUPPORTED_OPTIONS: &[&str] = &[
    "defaultEngineName",
    "allowOperation",
    "maxInputPixels",
    "maxOutputPixels",
    "root",
    "engines",
];

/// Operation names available on every pipeline regardless of engines.
const BUILT_IN_OPERATIONS: &[&str] = &["type", "source", "maxInputPixels", "maxOutputPixels"];

/// Single source of truth for which engines can do what.
///
/// Engines register during a startup phase via [`Registry::use_engine`];
/// afterwards the registry is used read-only. Pipelines borrow their
/// registry, so the borrow checker enforces that split.
pub struct Registry {
    options: RegistryOptions,
    default_engine_name: Option<String>,
    engine_by_name: HashMap<String, EngineDescriptor>,
    /// Per operation name, the engines claiming support, in registration
    /// order. Registration order is the priority order.
    engine_names_by_operation_name: HashMap<String, Vec<String>>,
    supported_by_engine_and_input_type: HashMap<String, HashSet<String>>,
    supported_by_engine_and_output_type: HashMap<String, HashSet<String>>,
    is_type_by_name: HashSet<String>,
    /// Dispatch vocabulary: every name invocable on a pipeline.
    operation_names: HashSet<String>,
    supported_options: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        let mut registry = Self {
            default_engine_name: options.default_engine_name.clone(),
            options,
            engine_by_name: HashMap::new(),
            engine_names_by_operation_name: HashMap::new(),
            supported_by_engine_and_input_type: HashMap::new(),
            supported_by_engine_and_output_type: HashMap::new(),
            is_type_by_name: HashSet::new(),
            operation_names: HashSet::new(),
            supported_options: BASE_SUPPORTED_OPTIONS.iter().map(|s| s.to_string()).collect(),
        };
        for name in BUILT_IN_OPERATIONS {
            registry.register_operation(name);
        }
        registry
    }

    /// Register an engine's capability declaration.
    ///
    /// The engine's own name and every declared output type become
    /// operations too. Registering a second engine under an existing name
    /// replaces the descriptor but appends to the operation lists, so
    /// resolution order stays registration order.
    pub fn use_engine(&mut self, engine: EngineDescriptor) -> Result<&mut Self, RegistryError> {
        if engine.name.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "engine name must be a non-empty string".into(),
            ));
        }
        let engine_name = engine.name.clone();
        info!("registering engine: {engine_name}");

        if self.default_engine_name.is_none() {
            self.default_engine_name = Some(engine_name.clone());
        }

        // Allow disabling via RegistryOptions { engines: {<name>: false} }.
        self.supported_options.push(engine_name.clone());

        // The engine name selects the engine, so it is an operation itself.
        for operation_name in std::iter::once(engine_name.as_str())
            .chain(engine.operations.iter().map(String::as_str))
        {
            self.engine_names_by_operation_name
                .entry(operation_name.to_string())
                .or_default()
                .push(engine_name.clone());
            self.register_operation(operation_name);
        }

        let mut input_types = HashSet::new();
        for type_name in &engine.input_types {
            self.is_type_by_name.insert(type_name.clone());
            input_types.insert(type_name.clone());
        }
        self.supported_by_engine_and_input_type
            .insert(engine_name.clone(), input_types);

        // Each output type is also an operation ("convert to type X").
        let mut output_types = HashSet::new();
        for type_name in &engine.output_types {
            self.register_operation(type_name);
            self.is_type_by_name.insert(type_name.clone());
            self.engine_names_by_operation_name
                .entry(type_name.clone())
                .or_default()
                .push(engine_name.clone());
            output_types.insert(type_name.clone());
        }
        self.supported_by_engine_and_output_type
            .insert(engine_name.clone(), output_types);

        self.engine_by_name.insert(engine_name, engine);
        Ok(self)
    }

    /// Idempotently add `name` to the pipeline operation vocabulary.
    /// The first registration wins; later ones are no-ops.
    pub fn register_operation(&mut self, name: &str) -> bool {
        if self.operation_names.contains(name) {
            return false;
        }
        debug!("operation registered: {name}");
        self.operation_names.insert(name.to_string());
        true
    }

    /// True iff at least one engine claiming `name` accepts `(name, args)`.
    /// An engine with no opinion accepts only zero-argument calls. An
    /// unclaimed name is plain `false`, never an error.
    pub fn is_valid_operation(&self, name: &str, args: &[ArgValue]) -> bool {
        let Some(engine_names) = self.engine_names_by_operation_name.get(name) else {
            return false;
        };
        engine_names.iter().any(|engine_name| {
            self.engine_by_name
                .get(engine_name)
                .is_some_and(|engine| match engine.validate_operation(name, args) {
                    Some(verdict) => verdict,
                    None => args.is_empty(),
                })
        })
    }

    /// Same acceptance rule as [`Registry::is_valid_operation`], restricted
    /// to one named engine. The engine must be among those recorded for
    /// `name`.
    pub fn is_valid_operation_for_engine(
        &self,
        engine_name: &str,
        name: &str,
        args: &[ArgValue],
    ) -> bool {
        let claimed = self
            .engine_names_by_operation_name
            .get(name)
            .is_some_and(|names| names.iter().any(|n| n == engine_name));
        if !claimed {
            return false;
        }
        match self
            .engine_by_name
            .get(engine_name)
            .and_then(|engine| engine.validate_operation(name, args))
        {
            Some(verdict) => verdict,
            None => args.is_empty(),
        }
    }

    /// Build a fresh pipeline seeded with this registry's configuration
    /// plus any overrides, pre-populated from `source` when given.
    pub fn create_pipeline(
        &self,
        options: Option<RegistryOptions>,
        source: Option<PipelineSource>,
    ) -> Pipeline<'_> {
        let mut pipeline = Pipeline::new(self, self.snapshot_options(options));
        match source {
            Some(PipelineSource::Query(query)) => {
                for operation in self.parse(&query).operations {
                    pipeline = pipeline.add(operation);
                }
            }
            Some(PipelineSource::List(operations)) => {
                for operation in operations {
                    pipeline = pipeline.add(operation);
                }
            }
            None => {}
        }
        pipeline
    }

    /// Sugar for `create_pipeline(None, None).add(operation)`.
    pub fn add(&self, operation: Operation) -> Pipeline<'_> {
        self.create_pipeline(None, None).add(operation)
    }

    /// Uniform dispatch by operation name: creates a throwaway pipeline and
    /// invokes the named operation on it.
    pub fn invoke(&self, name: &str, args: Vec<ArgValue>) -> Result<Pipeline<'_>, RegistryError> {
        self.create_pipeline(None, None).invoke(name, args)
    }

    /// Parse a textual operation query. See [`crate::query`].
    pub fn parse(&self, query: &str) -> ParsedQuery {
        parse_query(self, query)
    }

    pub fn default_engine_name(&self) -> Option<&str> {
        self.default_engine_name.as_deref()
    }

    pub fn engine(&self, name: &str) -> Option<&EngineDescriptor> {
        self.engine_by_name.get(name)
    }

    pub fn engines(&self) -> impl Iterator<Item = &EngineDescriptor> {
        self.engine_by_name.values()
    }

    /// Engines claiming `name`, in registration order.
    pub fn engines_for_operation(&self, name: &str) -> &[String] {
        self.engine_names_by_operation_name
            .get(name)
            .map_or(&[], Vec::as_slice)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operation_names.contains(name)
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.is_type_by_name.contains(name)
    }

    pub fn supports_input_type(&self, engine_name: &str, type_name: &str) -> bool {
        self.supported_by_engine_and_input_type
            .get(engine_name)
            .is_some_and(|types| types.contains(type_name))
    }

    pub fn supports_output_type(&self, engine_name: &str, type_name: &str) -> bool {
        self.supported_by_engine_and_output_type
            .get(engine_name)
            .is_some_and(|types| types.contains(type_name))
    }

    pub fn supported_options(&self) -> &[String] {
        self.supported_options.as_slice()
    }

    pub(crate) fn operation_allowed(&self, name: &str, args: &[ArgValue]) -> bool {
        self.options
            .allow_operation
            .as_ref()
            .map_or(true, |allow| allow(name, args))
    }

    fn snapshot_options(&self, overrides: Option<RegistryOptions>) -> PipelineOptions {
        let overrides = overrides.unwrap_or_default();
        let mut engines = self.options.engines.clone();
        engines.extend(overrides.engines);
        PipelineOptions {
            default_engine_name: overrides
                .default_engine_name
                .or_else(|| self.default_engine_name.clone()),
            max_input_pixels: overrides.max_input_pixels.or(self.options.max_input_pixels),
            max_output_pixels: overrides
                .max_output_pixels
                .or(self.options.max_output_pixels),
            root: overrides.root.or_else(|| self.options.root.clone()),
            engines,
            supported_options: self.supported_options.clone(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
