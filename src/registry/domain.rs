//! Value domains: typed predicates a field's value must satisfy.
//!
//! No coercion anywhere. A numeric string is not a number and an integer is
//! not a boolean.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    /// `{ "type": <string>, "value": <any> }` or a non-empty array of those.
    Image,
    NonEmptyString,
    Boolean,
    /// JSON number within [0.0, 1.0].
    UnitInterval,
    /// Integer >= 1.
    PositiveInteger,
    /// `null` or an array of strings.
    StringListOrNull,
    /// Array of objects each carrying numeric `x`, `y`, `width`, `height`.
    Detections,
}

impl ValueDomain {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueDomain::Image => match value {
                Value::Object(obj) => is_image_object(obj),
                Value::Array(items) => {
                    !items.is_empty()
                        && items
                            .iter()
                            .all(|item| item.as_object().is_some_and(is_image_object))
                }
                _ => false,
            },
            ValueDomain::NonEmptyString => value.as_str().is_some_and(|s| !s.is_empty()),
            ValueDomain::Boolean => value.is_boolean(),
            ValueDomain::UnitInterval => value.as_f64().is_some_and(|n| (0.0..=1.0).contains(&n)),
            ValueDomain::PositiveInteger => value.as_u64().is_some_and(|n| n >= 1),
            ValueDomain::StringListOrNull => match value {
                Value::Null => true,
                Value::Array(items) => items.iter().all(Value::is_string),
                _ => false,
            },
            ValueDomain::Detections => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| item.as_object().is_some_and(is_detection_object))
            }),
        }
    }

    /// Human-readable constraint, used as the "expected" part of errors.
    pub fn describe(&self) -> &'static str {
        match self {
            ValueDomain::Image => {
                "image object with 'type' and 'value' (or a non-empty list of them)"
            }
            ValueDomain::NonEmptyString => "non-empty string",
            ValueDomain::Boolean => "boolean",
            ValueDomain::UnitInterval => "number in [0.0, 1.0]",
            ValueDomain::PositiveInteger => "integer >= 1",
            ValueDomain::StringListOrNull => "list of strings or null",
            ValueDomain::Detections => "list of detections with numeric x, y, width, height",
        }
    }
}

fn is_image_object(obj: &Map<String, Value>) -> bool {
    obj.get("type").is_some_and(Value::is_string) && obj.contains_key("value")
}

fn is_detection_object(obj: &Map<String, Value>) -> bool {
    ["x", "y", "width", "height"]
        .iter()
        .all(|key| obj.get(*key).is_some_and(Value::is_number))
}

/// Default of an optional field, kept const-constructible for the static tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    None,
    Null,
    Bool(bool),
    Float(f64),
    Integer(u64),
}

impl FieldDefault {
    pub fn to_value(&self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Null => Some(Value::Null),
            FieldDefault::Bool(b) => Some(Value::Bool(*b)),
            FieldDefault::Float(n) => serde_json::Number::from_f64(*n).map(Value::Number),
            FieldDefault::Integer(n) => Some(Value::from(*n)),
        }
    }
}

/// Coarse shape of a value.
pub fn value_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Shape plus the value itself for scalars, e.g. `integer 38` or `string "some"`.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) => format!("array of {} item(s)", items.len()),
        Value::Object(_) => "object".to_string(),
        scalar => format!("{} {}", value_shape(scalar), scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_interval_bounds() {
        let domain = ValueDomain::UnitInterval;
        assert!(domain.accepts(&json!(0.0)));
        assert!(domain.accepts(&json!(0.4)));
        assert!(domain.accepts(&json!(1)));
        assert!(!domain.accepts(&json!(1.1)));
        assert!(!domain.accepts(&json!(-0.01)));
        assert!(!domain.accepts(&json!("0.4")));
        assert!(!domain.accepts(&Value::Null));
    }

    #[test]
    fn image_shapes() {
        let domain = ValueDomain::Image;
        assert!(domain.accepts(&json!({"type": "url", "value": "https://x/img.jpg"})));
        assert!(domain.accepts(&json!([{"type": "numpy_object", "value": [1, 2]}])));
        assert!(!domain.accepts(&json!("some")));
        assert!(!domain.accepts(&json!([])));
        assert!(!domain.accepts(&json!({"value": "x"})));
        assert!(!domain.accepts(&json!([{"type": "url", "value": "x"}, "y"])));
    }

    #[test]
    fn no_coercion_for_scalars() {
        assert!(!ValueDomain::Boolean.accepts(&json!("true")));
        assert!(!ValueDomain::Boolean.accepts(&json!(1)));
        assert!(!ValueDomain::NonEmptyString.accepts(&json!(38)));
        assert!(!ValueDomain::NonEmptyString.accepts(&json!({"a": "b"})));
        assert!(!ValueDomain::NonEmptyString.accepts(&json!("")));
        assert!(!ValueDomain::PositiveInteger.accepts(&json!(0)));
        assert!(!ValueDomain::PositiveInteger.accepts(&json!(3.5)));
        assert!(ValueDomain::PositiveInteger.accepts(&json!(300)));
    }

    #[test]
    fn string_list_or_null() {
        let domain = ValueDomain::StringListOrNull;
        assert!(domain.accepts(&Value::Null));
        assert!(domain.accepts(&json!(["car", "person"])));
        assert!(domain.accepts(&json!([])));
        assert!(!domain.accepts(&json!(["car", 1])));
        assert!(!domain.accepts(&json!("car")));
    }

    #[test]
    fn detections() {
        let domain = ValueDomain::Detections;
        let detection = json!({"x": 1, "y": 2.5, "width": 10, "height": 4, "class": "car"});
        assert!(domain.accepts(&json!([detection])));
        assert!(domain.accepts(&json!([])));
        assert!(!domain.accepts(&json!([{"x": 1, "y": 2}])));
        assert!(!domain.accepts(&json!({"x": 1, "y": 2, "width": 1, "height": 1})));
    }

    #[test]
    fn describes_received_values() {
        assert_eq!(describe_value(&json!(38)), "integer 38");
        assert_eq!(describe_value(&json!(1.1)), "float 1.1");
        assert_eq!(describe_value(&json!("some")), "string \"some\"");
        assert_eq!(describe_value(&json!(true)), "boolean true");
        assert_eq!(describe_value(&json!([1, 2])), "array of 2 item(s)");
        assert_eq!(describe_value(&Value::Null), "null");
    }

    #[test]
    fn defaults_materialize() {
        assert_eq!(FieldDefault::Float(0.4).to_value(), Some(json!(0.4)));
        assert_eq!(FieldDefault::Bool(false).to_value(), Some(json!(false)));
        assert_eq!(FieldDefault::Integer(300).to_value(), Some(json!(300)));
        assert_eq!(FieldDefault::None.to_value(), None);
    }
}
