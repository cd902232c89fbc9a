use std::fmt;

use crate::operation::ArgValue;

/// An engine's opinion on whether it accepts an operation call.
///
/// `None` means "no opinion"; the registry then accepts the call only when
/// it carries no arguments.
pub type ValidateFn = dyn Fn(&str, &[ArgValue]) -> Option<bool> + Send + Sync;

/// Capability declaration supplied by a plugin at registration time.
///
/// The registry only reads these fields; executing operations is the
/// engine's own business and happens outside this crate.
pub struct EngineDescriptor {
    /// Unique engine identifier, also usable as an operation name (engine
    /// selection is itself an operation).
    pub name: String,
    /// Operation names this engine can execute beyond its own name.
    pub operations: Vec<String>,
    /// Type identifiers the engine accepts.
    pub input_types: Vec<String>,
    /// Type identifiers the engine produces.
    pub output_types: Vec<String>,
    /// Not yet runtime-checked as usable. Recorded as-is by the registry.
    pub unavailable: bool,
    validate: Option<Box<ValidateFn>>,
}

impl EngineDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
            input_types: Vec::new(),
            output_types: Vec::new(),
            unavailable: true,
            validate: None,
        }
    }

    pub fn with_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations = operations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_input_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_validator(
        mut self,
        validate: impl Fn(&str, &[ArgValue]) -> Option<bool> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn available(mut self) -> Self {
        self.unavailable = false;
        self
    }

    /// Ask the engine whether it accepts `(name, args)`. An absent
    /// validator has no opinion.
    pub fn validate_operation(&self, name: &str, args: &[ArgValue]) -> Option<bool> {
        self.validate.as_ref().and_then(|validate| validate(name, args))
    }
}

impl fmt::Debug for EngineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineDescriptor")
            .field("name", &self.name)
            .field("operations", &self.operations)
            .field("input_types", &self.input_types)
            .field("output_types", &self.output_types)
            .field("unavailable", &self.unavailable)
            .field("has_validator", &self.validate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_defaults_to_true() {
        let engine = EngineDescriptor::new("magick");
        assert!(engine.unavailable);
        assert!(!EngineDescriptor::new("magick").available().unavailable);
    }

    #[test]
    fn test_absent_validator_has_no_opinion() {
        let engine = EngineDescriptor::new("magick");
        assert_eq!(engine.validate_operation("resize", &[]), None);
        assert_eq!(engine.validate_operation("resize", &[10.into()]), None);
    }

    #[test]
    fn test_validator_verdict_passes_through() {
        let engine = EngineDescriptor::new("magick")
            .with_validator(|name, args| match name {
                "resize" => Some(args.len() == 2),
                _ => None,
            });
        assert_eq!(
            engine.validate_operation("resize", &[10.into(), 10.into()]),
            Some(true)
        );
        assert_eq!(engine.validate_operation("resize", &[]), Some(false));
        assert_eq!(engine.validate_operation("rotate", &[]), None);
    }
}
