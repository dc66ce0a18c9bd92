//! WASM entry points for browser use.
//!
//! Every entry point takes JSON strings and returns a serializable DTO, so the
//! editor can run the same checks the graph builder runs.

use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::{ConstructionError, DeploymentError, Diagnostic, ExecutionGraphError};
use crate::parse::{self, NodeKind};
use crate::registry;

/// Parse and structurally validate a step definition.
/// Returns `{status: "success", step}` or `{status: "errors", errors}`.
#[wasm_bindgen]
pub fn construct_step(json: &str) -> JsValue {
    let result = construct_step_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn construct_step_inner(json: &str) -> ConstructResult {
    match parse::parse_step(json) {
        Ok(step) => ConstructResult::Success {
            step: step.to_value(),
        },
        Err(e) => ConstructResult::Errors {
            errors: vec![ErrorDto::from_error(e)],
        },
    }
}

/// Check the selector on `field_name` against an upstream node of kind
/// `source_kind`. Returns a JSON array of errors, empty when the edge is valid.
#[wasm_bindgen]
pub fn validate_field_selector(step_json: &str, field_name: &str, source_kind: &str) -> JsValue {
    let result = validate_field_selector_inner(step_json, field_name, source_kind);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_field_selector_inner(
    step_json: &str,
    field_name: &str,
    source_kind: &str,
) -> Vec<ErrorDto> {
    let step = match parse::parse_step(step_json) {
        Ok(s) => s,
        Err(e) => return vec![ErrorDto::from_error(e)],
    };

    let Some(source) = NodeKind::from_tag(source_kind) else {
        return vec![ErrorDto::from_error(ExecutionGraphError::UnknownSourceKind {
            step: step.name().to_string(),
            tag: source_kind.to_string(),
        })];
    };

    match step.validate_field_selector(field_name, &source) {
        Ok(()) => vec![],
        Err(e) => vec![ErrorDto::from_error(e)],
    }
}

/// Check a resolved runtime value (JSON) against the domain of `field_name`.
/// Returns a JSON array of errors, empty when the value is acceptable.
#[wasm_bindgen]
pub fn validate_field_binding(step_json: &str, field_name: &str, value_json: &str) -> JsValue {
    let result = validate_field_binding_inner(step_json, field_name, value_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_field_binding_inner(
    step_json: &str,
    field_name: &str,
    value_json: &str,
) -> Vec<ErrorDto> {
    let step = match parse::parse_step(step_json) {
        Ok(s) => s,
        Err(e) => return vec![ErrorDto::from_error(e)],
    };

    let value = match serde_json::from_str::<Value>(value_json) {
        Ok(v) => v,
        Err(e) => {
            return vec![ErrorDto::from_error(ConstructionError::MalformedDefinition {
                details: format!("failed to parse value JSON: {}", e),
            })];
        }
    };

    match step.validate_field_binding(field_name, &value) {
        Ok(()) => vec![],
        Err(e) => vec![ErrorDto::from_error(e)],
    }
}

/// Describe every registered step kind: fields, binding modes, accepted
/// source kinds, value domains and outputs.
#[wasm_bindgen]
pub fn describe_registry() -> JsValue {
    serde_wasm_bindgen::to_value(&registry::describe()).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    step: Option<String>,
}

impl ErrorDto {
    fn from_error(e: impl Into<DeploymentError>) -> Self {
        ErrorDto::from(Diagnostic::from_error(e))
    }
}

impl From<Diagnostic> for ErrorDto {
    fn from(d: Diagnostic) -> Self {
        ErrorDto {
            code: d.code,
            phase: d.phase.to_string(),
            message: d.message,
            step: d.step,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status")]
enum ConstructResult {
    #[serde(rename = "success")]
    Success { step: Value },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: &str = r#"{
        "type": "ClassificationModel",
        "name": "some",
        "image": "$inputs.image",
        "model_id": "$inputs.model"
    }"#;

    #[test]
    fn construct_success_echoes_definition() {
        match construct_step_inner(STEP) {
            ConstructResult::Success { step } => {
                assert_eq!(step["name"], "some");
                assert_eq!(step["model_id"], "$inputs.model");
            }
            ConstructResult::Errors { errors } => panic!("Expected success, got {:?}", errors),
        }
    }

    #[test]
    fn construct_failure_reports_code() {
        let json = r#"{"type": "classificationmodel", "name": "some"}"#;
        match construct_step_inner(json) {
            ConstructResult::Errors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].code, "C001");
                assert_eq!(errors[0].phase, "Construct");
                assert_eq!(errors[0].step, None);
            }
            ConstructResult::Success { step } => panic!("Expected errors, got {}", step),
        }
    }

    #[test]
    fn selector_check_by_kind_tag() {
        assert!(validate_field_selector_inner(STEP, "image", "InferenceImage").is_empty());

        let errors = validate_field_selector_inner(STEP, "image", "InferenceParameter");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "S001");
        assert_eq!(errors[0].phase, "Wiring");
        assert_eq!(errors[0].step.as_deref(), Some("some"));

        let errors = validate_field_selector_inner(STEP, "image", "Image");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "G004");
        assert_eq!(errors[0].phase, "Wiring");
        assert_eq!(errors[0].step.as_deref(), Some("some"));
        assert_eq!(
            errors[0].message,
            "Step 'some' is wired to a node of unrecognized kind 'Image'"
        );
    }

    #[test]
    fn binding_check_parses_value() {
        assert!(validate_field_binding_inner(STEP, "confidence", "0.4").is_empty());

        let errors = validate_field_binding_inner(STEP, "model_id", "38");
        assert_eq!(errors[0].code, "B001");
        assert_eq!(errors[0].phase, "Binding");

        let errors = validate_field_binding_inner(STEP, "model_id", "{not json");
        assert_eq!(errors[0].code, "C008");
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let json = serde_json::to_value(construct_step_inner(STEP)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["step"]["type"], "ClassificationModel");

        let json = serde_json::to_value(construct_step_inner("{}")).unwrap();
        assert_eq!(json["status"], "errors");
        assert_eq!(json["errors"][0]["code"], "C002");
    }
}
