//! Strict structural check of JSON settings before deserialisation.
//!
//! Every recognised attribute is listed in a static [`Field`] table. The walker
//! reports the first attribute whose JSON type differs from the table, or the
//! first attribute the table does not list, using a dotted path such as
//! `sights[1].roi[0].width`.
use crate::error::{Error, Result};
use serde_json::{Map, Value};

#[derive(Debug)]
pub enum Kind {
    Integer,
    /// Integer in `0..=u32::MAX`.
    Unsigned,
    /// Any JSON number, integers included.
    Number,
    String,
    /// String restricted to the listed values.
    OneOf(&'static [&'static str]),
    Boolean,
    Object(&'static [Field]),
    Array(&'static Kind),
}

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

impl Kind {
    fn describe(&self) -> String {
        match self {
            Kind::Integer => "integer".to_string(),
            Kind::Unsigned => "unsigned integer".to_string(),
            Kind::Number => "number".to_string(),
            Kind::String => "string".to_string(),
            Kind::OneOf(options) => format!("one of {}", options.join("|")),
            Kind::Boolean => "boolean".to_string(),
            Kind::Object(_) => "object".to_string(),
            Kind::Array(_) => "array".to_string(),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Kind::Integer => value.is_i64() || value.is_u64(),
            Kind::Unsigned => value.as_u64().is_some_and(|v| v <= u64::from(u32::MAX)),
            Kind::Number => value.is_number(),
            Kind::String => value.is_string(),
            Kind::OneOf(options) => value
                .as_str()
                .is_some_and(|v| options.iter().any(|o| *o == v)),
            Kind::Boolean => value.is_boolean(),
            Kind::Object(_) => value.is_object(),
            Kind::Array(_) => value.is_array(),
        }
    }
}

/// JSON type of `value`, with the value itself for scalars a kind rejected on
/// range rather than type (`integer -20`, `string "sharpen"`).
fn describe_actual(kind: &Kind, value: &Value) -> String {
    match (kind, value) {
        (Kind::Unsigned, Value::Number(n)) if !n.is_f64() => format!("integer {n}"),
        (Kind::OneOf(_), Value::String(v)) => format!("string {v:?}"),
        _ => json_type(value).to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate `value` (the document root) against an object schema.
pub fn validate(value: &Value, fields: &'static [Field]) -> Result<()> {
    check(value, &Kind::Object(fields), "")
}

fn check(value: &Value, kind: &Kind, path: &str) -> Result<()> {
    if !kind.accepts(value) {
        return Err(Error::Schema {
            attribute: display_path(path),
            expected: kind.describe(),
            actual: describe_actual(kind, value),
        });
    }
    match (kind, value) {
        (Kind::Object(fields), Value::Object(map)) => check_object(map, fields, path),
        (Kind::Array(item), Value::Array(items)) => {
            for (i, v) in items.iter().enumerate() {
                check(v, item, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_object(map: &Map<String, Value>, fields: &'static [Field], path: &str) -> Result<()> {
    for key in map.keys() {
        if !fields.iter().any(|f| f.name == key) {
            return Err(Error::UnknownAttribute {
                attribute: join(path, key),
            });
        }
    }
    for field in fields {
        let child = join(path, field.name);
        match map.get(field.name) {
            Some(v) => check(v, &field.kind, &child)?,
            None if field.required => {
                return Err(Error::Schema {
                    attribute: child,
                    expected: field.kind.describe(),
                    actual: "nothing".to_string(),
                })
            }
            None => {}
        }
    }
    Ok(())
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static POINT: [Field; 2] = [
        Field::required("x", Kind::Integer),
        Field::optional("label", Kind::String),
    ];
    static POINT_KIND: Kind = Kind::Object(&POINT);
    static ROOT: [Field; 2] = [
        Field::required("points", Kind::Array(&POINT_KIND)),
        Field::optional("weight", Kind::Number),
    ];

    #[test]
    fn accepts_valid_document() {
        let doc = json!({"points": [{"x": 1}, {"x": 2, "label": "b"}], "weight": 3});
        validate(&doc, &ROOT).unwrap();
    }

    #[test]
    fn reports_path_expected_and_actual() {
        let doc = json!({"points": [{"x": 1}, {"x": "two"}]});
        match validate(&doc, &ROOT) {
            Err(Error::Schema {
                attribute,
                expected,
                actual,
            }) => {
                assert_eq!(attribute, "points[1].x");
                assert_eq!(expected, "integer");
                assert_eq!(actual, "string");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn float_is_not_an_integer() {
        let doc = json!({"points": [{"x": 1.5}]});
        assert!(matches!(validate(&doc, &ROOT), Err(Error::Schema { .. })));
    }

    static RANGE: [Field; 2] = [
        Field::required("size", Kind::Unsigned),
        Field::optional("mode", Kind::OneOf(&["fast", "slow"])),
    ];

    #[test]
    fn unsigned_rejects_negative_and_oversized_values() {
        validate(&json!({"size": 0}), &RANGE).unwrap();
        validate(&json!({"size": 4_294_967_295u64}), &RANGE).unwrap();

        let err = validate(&json!({"size": -20}), &RANGE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error with the attribute \"size\". Expected unsigned integer but had integer -20."
        );
        assert!(validate(&json!({"size": 4_294_967_296u64}), &RANGE).is_err());
        assert!(validate(&json!({"size": 2.0}), &RANGE).is_err());
    }

    #[test]
    fn one_of_lists_the_accepted_values() {
        validate(&json!({"size": 1, "mode": "slow"}), &RANGE).unwrap();
        match validate(&json!({"size": 1, "mode": "warp"}), &RANGE) {
            Err(Error::Schema {
                attribute,
                expected,
                actual,
            }) => {
                assert_eq!(attribute, "mode");
                assert_eq!(expected, "one of fast|slow");
                assert_eq!(actual, "string \"warp\"");
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_and_missing_attributes_are_rejected() {
        let doc = json!({"points": [], "extra": true});
        match validate(&doc, &ROOT) {
            Err(Error::UnknownAttribute { attribute }) => assert_eq!(attribute, "extra"),
            other => panic!("expected unknown attribute, got {other:?}"),
        }

        let doc = json!({"weight": 1});
        match validate(&doc, &ROOT) {
            Err(Error::Schema {
                attribute, actual, ..
            }) => {
                assert_eq!(attribute, "points");
                assert_eq!(actual, "nothing");
            }
            other => panic!("expected missing attribute, got {other:?}"),
        }
    }
}
