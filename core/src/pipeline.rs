use crate::config::PipelineOptions;
use crate::error::RegistryError;
use crate::operation::{ArgValue, Operation};
use crate::registry::Registry;

/// Operations input accepted by [`Registry::create_pipeline`]: either a
/// textual query or an already structured operation list.
pub enum PipelineSource {
    Query(String),
    List(Vec<Operation>),
}

impl From<&str> for PipelineSource {
    fn from(query: &str) -> Self {
        PipelineSource::Query(query.to_string())
    }
}

impl From<String> for PipelineSource {
    fn from(query: String) -> Self {
        PipelineSource::Query(query)
    }
}

impl From<Vec<Operation>> for PipelineSource {
    fn from(operations: Vec<Operation>) -> Self {
        PipelineSource::List(operations)
    }
}

/// An ordered list of operations bound to the registry that described
/// them, plus a frozen option snapshot taken at creation.
///
/// Each pipeline is created fresh per call and privately owned by its
/// caller; nothing is shared between pipelines beyond the snapshot.
pub struct Pipeline<'r> {
    registry: &'r Registry,
    options: PipelineOptions,
    operations: Vec<Operation>,
}

impl<'r> Pipeline<'r> {
    pub(crate) fn new(registry: &'r Registry, options: PipelineOptions) -> Self {
        Self {
            registry,
            options,
            operations: Vec::new(),
        }
    }

    /// Append an operation, returning the pipeline for fluent chaining.
    pub fn add(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Append the named operation if the registry vocabulary knows it.
    /// Appending does not validate arguments; validation is the query
    /// parser's concern.
    pub fn invoke(self, name: &str, args: Vec<ArgValue>) -> Result<Self, RegistryError> {
        if !self.registry.has_operation(name) {
            return Err(RegistryError::UnknownOperation(name.to_string()));
        }
        Ok(self.add(Operation::new(name, args)))
    }

    /// Declare the target type of the pipeline's output.
    pub fn set_type(self, type_name: impl Into<String>) -> Self {
        self.add(Operation::new("type", vec![ArgValue::Str(type_name.into())]))
    }

    /// Declare the source the pipeline reads from.
    pub fn source(self, source: impl Into<String>) -> Self {
        self.add(Operation::new("source", vec![ArgValue::Str(source.into())]))
    }

    pub fn max_input_pixels(self, pixels: i64) -> Self {
        self.add(Operation::new("maxInputPixels", vec![ArgValue::Int(pixels)]))
    }

    pub fn max_output_pixels(self, pixels: i64) -> Self {
        self.add(Operation::new("maxOutputPixels", vec![ArgValue::Int(pixels)]))
    }

    pub fn operations(&self) -> &[Operation] {
        self.operations.as_slice()
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineDescriptor;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .use_engine(
                EngineDescriptor::new("magick")
                    .with_operations(["resize", "rotate"])
                    .with_output_types(["png"]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_fluent_chaining_preserves_order() {
        let registry = registry();
        let pipeline = registry
            .create_pipeline(None, None)
            .invoke("resize", vec![10.into(), 10.into()])
            .unwrap()
            .invoke("rotate", vec![90.into()])
            .unwrap();
        assert_eq!(
            pipeline.operations(),
            [
                Operation::new("resize", vec![10.into(), 10.into()]),
                Operation::new("rotate", vec![90.into()]),
            ]
        );
    }

    #[test]
    fn test_invoke_rejects_unknown_name() {
        let registry = registry();
        let result = registry.create_pipeline(None, None).invoke("sharpen", vec![]);
        assert!(matches!(result, Err(RegistryError::UnknownOperation(_))));
    }

    #[test]
    fn test_invoke_does_not_validate_arguments() {
        // Appending is unchecked beyond the vocabulary; parse() validates.
        let registry = registry();
        let pipeline = registry
            .create_pipeline(None, None)
            .invoke("resize", vec!["wide".into()])
            .unwrap();
        assert_eq!(pipeline.operations().len(), 1);
    }

    #[test]
    fn test_built_in_operations() {
        let registry = registry();
        let pipeline = registry
            .create_pipeline(None, None)
            .set_type("png")
            .source("input.jpg")
            .max_input_pixels(1_000_000)
            .max_output_pixels(500_000);
        let names: Vec<&str> = pipeline
            .operations()
            .iter()
            .map(|op| op.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["type", "source", "maxInputPixels", "maxOutputPixels"]
        );
    }

    #[test]
    fn test_pipelines_are_isolated() {
        let registry = registry();
        let first = registry.add(Operation::new("rotate", vec![90.into()]));
        let second = registry.create_pipeline(None, None);
        assert_eq!(first.operations().len(), 1);
        assert!(second.operations().is_empty());
    }
}
