//! Structural validation of generator output.
//!
//! The whole payload is checked before any scene mutation so a bad entry
//! never leaves a half-applied layout behind.

use serde_json::Value;
use shared::{LayoutEntry, MassParams};

use crate::error::StudioError;

/// Parse a generator payload into mass parameters.
///
/// Accepts either a bare array of entries or an object carrying a
/// `masses` array.
pub fn parse_layout(value: &Value) -> Result<Vec<MassParams>, StudioError> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(map) => match map.get("masses") {
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(malformed("`masses` is not an array")),
            None => return Err(malformed("object has no `masses` array")),
        },
        other => return Err(malformed(format!("expected an array, got {}", kind(other)))),
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(i, entry))
        .collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<MassParams, StudioError> {
    if !entry.is_object() {
        return Err(malformed(format!("entry {index} is {}, not an object", kind(entry))));
    }
    let parsed: LayoutEntry = serde_json::from_value(entry.clone())
        .map_err(|e| malformed(format!("entry {index}: {e}")))?;

    check_dimension(index, "width", Some(parsed.width))?;
    check_dimension(index, "depth", Some(parsed.depth))?;
    check_dimension(index, "height", parsed.height)?;
    for (name, coord) in [("x", parsed.x), ("z", parsed.z)] {
        if coord.is_some_and(|v| !v.is_finite()) {
            return Err(malformed(format!("entry {index}: `{name}` is not finite")));
        }
    }

    Ok(parsed.into())
}

fn check_dimension(index: usize, name: &str, value: Option<f64>) -> Result<(), StudioError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(malformed(format!(
            "entry {index}: `{name}` must be a positive number, got {v}"
        ))),
        _ => Ok(()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn malformed(msg: impl Into<String>) -> StudioError {
    StudioError::MalformedLayout(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let params = parse_layout(&json!([
            { "w": 80, "d": 40, "program": "Lobby" },
            { "width": 60, "depth": 60, "height": 200, "x": 10, "z": -10 }
        ]))
        .unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].width, Some(80.0));
        assert_eq!(params[0].height, None);
        assert_eq!(params[0].program.as_deref(), Some("Lobby"));
        assert_eq!(params[1].height, Some(200.0));
        assert_eq!(params[1].z, Some(-10.0));
    }

    #[test]
    fn test_masses_envelope() {
        let params = parse_layout(&json!({ "masses": [{ "w": 10, "d": 10 }] })).unwrap();
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_layout(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_string_rejected() {
        let err = parse_layout(&json!("not an array")).unwrap_err();
        assert!(matches!(err, StudioError::MalformedLayout(_)));
    }

    #[test]
    fn test_object_without_masses_rejected() {
        assert!(parse_layout(&json!({ "buildings": [] })).is_err());
        assert!(parse_layout(&json!({ "masses": 3 })).is_err());
    }

    #[test]
    fn test_bad_entry_names_index() {
        let err = parse_layout(&json!([{ "w": 10, "d": 10 }, { "w": 10 }])).unwrap_err();
        match err {
            StudioError::MalformedLayout(msg) => assert!(msg.contains("entry 1"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_types_rejected() {
        assert!(parse_layout(&json!([{ "w": "wide", "d": 10 }])).is_err());
        assert!(parse_layout(&json!([{ "w": 10, "d": 10, "program": 7 }])).is_err());
        assert!(parse_layout(&json!([42])).is_err());
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        assert!(parse_layout(&json!([{ "w": 0, "d": 10 }])).is_err());
        assert!(parse_layout(&json!([{ "w": 10, "d": 10, "h": -1 }])).is_err());
    }
}
