use serde_json::{Map, Value, json};
use step_typecheck::*;

// =============================================================================
// Definition builders
// =============================================================================

/// Step kinds that share the model field table (image, model_id,
/// disable_active_learning, confidence).
pub const CLASSIFICATION_KINDS: [StepKind; 2] = [
    StepKind::ClassificationModel,
    StepKind::MultiLabelClassificationModel,
];

/// Smallest valid definition of a classification-like step.
pub fn minimal_definition(kind: StepKind) -> Value {
    json!({
        "type": kind.as_str(),
        "name": "some",
        "image": "$inputs.image",
        "model_id": "some/1",
    })
}

/// Minimal definition with `overrides` merged on top.
pub fn definition_with(kind: StepKind, overrides: Value) -> Value {
    let mut definition = minimal_definition(kind);
    if let (Some(target), Value::Object(extra)) = (definition.as_object_mut(), overrides) {
        for (key, value) in extra {
            target.insert(key, value);
        }
    }
    definition
}

/// Parse a definition that is expected to be structurally valid.
pub fn step(definition: &Value) -> StepInstance {
    parse::parse_step_value(definition)
        .unwrap_or_else(|e| panic!("Expected valid definition {}, got {}", definition, e))
}

/// Classification-like step whose `model_id` is wired to an input.
pub fn wired_step(kind: StepKind) -> StepInstance {
    step(&definition_with(kind, json!({"model_id": "$inputs.model"})))
}

pub fn without(definition: &Value, field: &str) -> Map<String, Value> {
    let mut map = definition
        .as_object()
        .cloned()
        .expect("definition is an object");
    map.remove(field);
    map
}

// =============================================================================
// Source nodes
// =============================================================================

pub fn image_input() -> InputNode {
    InputNode::image("image")
}

pub fn parameter_input() -> InputNode {
    InputNode::parameter("some")
}

pub fn all_node_kinds() -> Vec<NodeKind> {
    InputKind::ALL
        .into_iter()
        .map(NodeKind::Input)
        .chain(StepKind::ALL.into_iter().map(NodeKind::Step))
        .collect()
}

// =============================================================================
// Runtime values
// =============================================================================

pub fn image_value() -> Value {
    json!({"type": "url", "value": "https://media.roboflow.com/dog.jpeg"})
}
