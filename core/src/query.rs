//! The textual query mini-language: `&`-joined `key` or `key=value`
//! fragments, with `+` and `,` both separating arguments inside a value
//! and all pieces percent-encoded.
//!
//! Parsing is total. Fragments the registry does not claim (or the
//! configured allow gate rejects) are preserved verbatim in `leftover`,
//! so another concern can layer its own parser over the same query
//! without this one consuming its keys.

use log::debug;
use serde::Serialize;

use crate::operation::{ArgValue, Operation};
use crate::registry::Registry;

/// Result of parsing a textual operation query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedQuery {
    pub operations: Vec<Operation>,
    /// Fragments not claimed as operations, rejoined with `&` in their
    /// original relative order, raw and un-decoded.
    pub leftover: String,
}

pub(crate) fn parse_query(registry: &Registry, query: &str) -> ParsedQuery {
    let mut operations = Vec::new();
    let mut leftover: Vec<&str> = Vec::new();

    for fragment in query.split('&') {
        let (raw_key, raw_value) = match fragment.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (fragment, None),
        };
        if raw_key.is_empty() {
            // Not a key[=value] fragment; dropped, by lenient-parsing
            // policy.
            continue;
        }

        let Ok(name) = urlencoding::decode(raw_key) else {
            leftover.push(fragment);
            continue;
        };
        let args = match raw_value.map(decode_args) {
            Some(Some(args)) => args,
            Some(None) => {
                // Undecodable argument; parsing stays total, so the
                // fragment is routed to leftover rather than failing.
                leftover.push(fragment);
                continue;
            }
            None => Vec::new(),
        };

        if registry.is_valid_operation(&name, &args) && registry.operation_allowed(&name, &args) {
            operations.push(Operation::new(name.into_owned(), args));
        } else {
            debug!("unclaimed query fragment: {fragment}");
            leftover.push(fragment);
        }
    }

    ParsedQuery {
        operations,
        leftover: leftover.join("&"),
    }
}

fn decode_args(value: &str) -> Option<Vec<ArgValue>> {
    value
        .split(['+', ','])
        .map(|token| {
            urlencoding::decode(token)
                .ok()
                .map(|decoded| ArgValue::coerce(&decoded))
        })
        .collect()
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
                    .with_operations(["resize", "rotate", "crop"])
                    .with_output_types(["png", "jpeg"])
                    .with_validator(|name, args| match name {
                        "resize" => {
                            Some(args.len() == 2 && args.iter().all(|a| a.as_int().is_some()))
                        }
                        "rotate" => Some(args.len() <= 3),
                        "crop" => Some(args.len() == 1),
                        _ => None,
                    }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_round_trip_single_operation() {
        let parsed = registry().parse("resize=100,200");
        assert_eq!(
            parsed.operations,
            [Operation::new("resize", vec![100.into(), 200.into()])]
        );
        assert_eq!(parsed.leftover, "");
    }

    #[test]
    fn test_leftover_preserved_verbatim() {
        let parsed = registry().parse("unknownOp=5&resize=10,10");
        assert_eq!(
            parsed.operations,
            [Operation::new("resize", vec![10.into(), 10.into()])]
        );
        assert_eq!(parsed.leftover, "unknownOp=5");
    }

    #[test]
    fn test_leftover_keeps_relative_order() {
        let parsed = registry().parse("foo=1&resize=10,10&bar&baz=2");
        assert_eq!(parsed.leftover, "foo=1&bar&baz=2");
    }

    #[test]
    fn test_type_coercion() {
        let parsed = registry().parse("rotate=true,45,hello");
        assert_eq!(
            parsed.operations,
            [Operation::new(
                "rotate",
                vec![true.into(), 45.into(), "hello".into()]
            )]
        );
    }

    #[test]
    fn test_plus_and_comma_both_separate_arguments() {
        let parsed = registry().parse("rotate=1+2,3");
        assert_eq!(
            parsed.operations,
            [Operation::new("rotate", vec![1.into(), 2.into(), 3.into()])]
        );
    }

    #[test]
    fn test_bare_key_is_zero_argument_operation() {
        let parsed = registry().parse("png");
        assert_eq!(parsed.operations, [Operation::new("png", vec![])]);
    }

    #[test]
    fn test_empty_value_yields_one_empty_string_argument() {
        // Intentional pass-through: splitting "" produces one empty piece.
        let parsed = registry().parse("crop=");
        assert_eq!(parsed.operations, [Operation::new("crop", vec!["".into()])]);
    }

    #[test]
    fn test_percent_decoding() {
        let parsed = registry().parse("crop=north%20east");
        assert_eq!(
            parsed.operations,
            [Operation::new("crop", vec!["north east".into()])]
        );
    }

    #[test]
    fn test_undecodable_fragment_goes_to_leftover() {
        // %FF is not valid UTF-8 once decoded.
        let parsed = registry().parse("crop=%FF&resize=10,10");
        assert_eq!(parsed.operations.len(), 1);
        assert_eq!(parsed.leftover, "crop=%FF");
    }

    #[test]
    fn test_shape_invalid_fragments_silently_dropped() {
        let parsed = registry().parse("=5&&resize=10,10");
        assert_eq!(
            parsed.operations,
            [Operation::new("resize", vec![10.into(), 10.into()])]
        );
        assert_eq!(parsed.leftover, "");
    }

    #[test]
    fn test_rejected_arguments_go_to_leftover() {
        let parsed = registry().parse("resize=10");
        assert!(parsed.operations.is_empty());
        assert_eq!(parsed.leftover, "resize=10");
    }

    #[test]
    fn test_fragment_encoding_round_trips() {
        let registry = registry();
        let original = registry.parse("resize=100,200&rotate=true,45,a%26b");
        let rejoined: Vec<String> = original
            .operations
            .iter()
            .map(Operation::to_query_fragment)
            .collect();
        let reparsed = registry.parse(&rejoined.join("&"));
        assert_eq!(reparsed.operations, original.operations);
    }
}
