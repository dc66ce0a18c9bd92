//! Parse phase: JSON definitions → step instances and input nodes.

pub mod selector;
pub mod step;
pub mod types;

pub use selector::{Selector, SelectorSyntaxError, looks_like_selector};
pub use step::{FieldValue, StepInstance};
pub use types::*;

use serde_json::Value;

use crate::error::ConstructionError;

/// Deserialize a step definition and run structural validation on it.
pub fn parse_step(json: &str) -> Result<StepInstance, ConstructionError> {
    let value: Value = serde_json::from_str(json).map_err(|e| malformed("step", e))?;
    parse_step_value(&value)
}

/// Structural validation of an already-deserialized step definition. The
/// kind comes from the definition's own `type` field.
pub fn parse_step_value(value: &Value) -> Result<StepInstance, ConstructionError> {
    let fields = value
        .as_object()
        .ok_or_else(|| ConstructionError::MalformedDefinition {
            details: "step definition must be a JSON object".into(),
        })?;
    let tag = discriminator(fields)?;
    crate::validate::construct(tag, fields)
}

/// Deserialize a workflow input node.
pub fn parse_input(json: &str) -> Result<InputNode, ConstructionError> {
    let value: Value = serde_json::from_str(json).map_err(|e| malformed("input", e))?;
    parse_input_value(value)
}

pub fn parse_input_value(value: Value) -> Result<InputNode, ConstructionError> {
    let fields = value
        .as_object()
        .ok_or_else(|| ConstructionError::MalformedDefinition {
            details: "input definition must be a JSON object".into(),
        })?;
    let tag = discriminator(fields)?;
    if InputKind::from_tag(tag).is_none() {
        return Err(ConstructionError::UnrecognizedKind { tag: tag.into() });
    }
    serde_json::from_value(value).map_err(|e| malformed("input", e))
}

fn discriminator(fields: &serde_json::Map<String, Value>) -> Result<&str, ConstructionError> {
    match fields.get("type") {
        None => Err(ConstructionError::MissingRequiredField {
            field: "type".into(),
        }),
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(ConstructionError::WrongLiteralType {
            field: "type".into(),
            expected: "string".into(),
            received: crate::registry::domain::describe_value(other),
        }),
    }
}

fn malformed(what: &str, e: serde_json::Error) -> ConstructionError {
    ConstructionError::MalformedDefinition {
        details: format!("failed to parse {} JSON: {}", what, e),
    }
}
