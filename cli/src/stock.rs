use serde::Serialize;

use improc_core::{ArgValue, EngineDescriptor, Registry};

/// Build a registry loaded with the stock engine descriptors.
///
/// These are capability declarations only; the tools they describe run
/// elsewhere. Registration order matters: the general-purpose engine goes
/// first so it becomes the default and wins ties.
pub fn stock_registry() -> Registry {
    let mut registry = Registry::new();
    for engine in stock_engines() {
        registry
            .use_engine(engine)
            .expect("stock engine names are non-empty");
    }
    registry
}

pub fn stock_engines() -> Vec<EngineDescriptor> {
    vec![
        EngineDescriptor::new("magick")
            .with_operations(["resize", "crop", "rotate", "quality", "progressive"])
            .with_input_types(["png", "jpeg", "gif", "webp", "bmp", "tiff"])
            .with_output_types(["png", "jpeg", "gif", "webp"])
            .with_validator(validate_magick),
        EngineDescriptor::new("oxipng")
            .with_input_types(["png"])
            .with_output_types(["png"])
            .with_validator(|name, args| match name {
                // Optional optimization level 0-6.
                "oxipng" => Some(match args {
                    [] => true,
                    [ArgValue::Int(level)] => (0..=6).contains(level),
                    _ => false,
                }),
                _ => None,
            }),
        EngineDescriptor::new("resvg")
            .with_input_types(["svg"])
            .with_output_types(["png"]),
        EngineDescriptor::new("gifsicle")
            .with_operations(["interlace"])
            .with_input_types(["gif"])
            .with_output_types(["gif"]),
        EngineDescriptor::new("metadata")
            .with_input_types(["png", "jpeg", "gif", "webp"])
            .with_output_types(["json"]),
    ]
}

fn validate_magick(name: &str, args: &[ArgValue]) -> Option<bool> {
    match name {
        "resize" => Some(matches!(
            args,
            [ArgValue::Int(w), ArgValue::Int(h)] if *w > 0 && *h > 0
        )),
        "crop" => Some(matches!(args, [ArgValue::Str(_)])),
        "rotate" => Some(match args {
            [] => true,
            [ArgValue::Int(degrees)] => degrees % 90 == 0,
            _ => false,
        }),
        "quality" => Some(matches!(args, [ArgValue::Int(q)] if (1..=100).contains(q))),
        "progressive" => Some(args.is_empty()),
        _ => None,
    }
}

/// Serializable view of an engine's capability declaration.
#[derive(Debug, Serialize)]
pub struct EngineSummary {
    pub name: String,
    pub operations: Vec<String>,
    pub input_types: Vec<String>,
    pub output_types: Vec<String>,
    pub unavailable: bool,
}

impl From<&EngineDescriptor> for EngineSummary {
    fn from(engine: &EngineDescriptor) -> Self {
        Self {
            name: engine.name.clone(),
            operations: engine.operations.clone(),
            input_types: engine.input_types.clone(),
            output_types: engine.output_types.clone(),
            unavailable: engine.unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magick_is_default_engine() {
        let registry = stock_registry();
        assert_eq!(registry.default_engine_name(), Some("magick"));
    }

    #[test]
    fn test_resize_arity() {
        let registry = stock_registry();
        assert!(registry.is_valid_operation("resize", &[100.into(), 200.into()]));
        assert!(!registry.is_valid_operation("resize", &[100.into()]));
        assert!(!registry.is_valid_operation("resize", &[0.into(), 200.into()]));
        assert!(!registry.is_valid_operation("resize", &["wide".into(), 200.into()]));
    }

    #[test]
    fn test_rotate_requires_right_angles() {
        let registry = stock_registry();
        assert!(registry.is_valid_operation("rotate", &[]));
        assert!(registry.is_valid_operation("rotate", &[270.into()]));
        assert!(!registry.is_valid_operation("rotate", &[45.into()]));
    }

    #[test]
    fn test_oxipng_level_bounds() {
        let registry = stock_registry();
        assert!(registry.is_valid_operation_for_engine("oxipng", "oxipng", &[]));
        assert!(registry.is_valid_operation_for_engine("oxipng", "oxipng", &[6.into()]));
        assert!(!registry.is_valid_operation_for_engine("oxipng", "oxipng", &[7.into()]));
    }

    #[test]
    fn test_output_types_are_selectable() {
        let registry = stock_registry();
        // png is claimed by magick, oxipng, and resvg alike.
        assert!(registry.is_valid_operation("png", &[]));
        assert!(registry.is_valid_operation("json", &[]));
        assert!(registry.engines_for_operation("png").contains(&"resvg".to_string()));
    }
}
