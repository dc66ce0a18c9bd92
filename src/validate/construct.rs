//! Structural validation of step definitions.
//!
//! Runs before any wiring or binding check: a definition that fails here never
//! becomes a [`StepInstance`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::ConstructionError;
use crate::parse::selector::{Selector, looks_like_selector};
use crate::parse::step::{FieldValue, StepInstance};
use crate::parse::types::StepKind;
use crate::registry::domain::describe_value;
use crate::registry::{FieldSpec, get_field_spec};

/// Build a step of kind `tag` from its field mapping.
///
/// `field_values` carries `name` and the kind's own fields. A `type` entry is
/// tolerated only when it repeats `tag` exactly.
pub fn construct(
    tag: &str,
    field_values: &Map<String, Value>,
) -> Result<StepInstance, ConstructionError> {
    let result = construct_inner(tag, field_values);
    match &result {
        Ok(step) => trace!(kind = tag, step = step.name(), "step constructed"),
        Err(e) => debug!(kind = tag, code = e.code(), error = %e, "step construction rejected"),
    }
    result
}

fn construct_inner(
    tag: &str,
    field_values: &Map<String, Value>,
) -> Result<StepInstance, ConstructionError> {
    let kind: StepKind = tag.parse()?;

    if let Some(declared) = field_values.get("type")
        && declared.as_str() != Some(tag)
    {
        let tag = declared
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| declared.to_string());
        return Err(ConstructionError::UnrecognizedKind { tag });
    }

    let name = step_name(field_values)?;

    // Unknown keys first, so a typo is reported as such rather than as the
    // required field it was meant to be.
    for key in field_values.keys() {
        if key != "type" && key != "name" {
            get_field_spec(kind, key)?;
        }
    }

    let schema = kind.schema();
    for spec in schema.required_fields() {
        if !field_values.contains_key(spec.name) {
            return Err(ConstructionError::MissingRequiredField {
                field: spec.name.to_string(),
            });
        }
    }

    let mut fields = BTreeMap::new();
    for spec in schema.fields {
        if let Some(value) = field_values.get(spec.name) {
            fields.insert(spec.name.to_string(), field_value(kind, spec, value)?);
        }
    }

    Ok(StepInstance::from_parts(kind, name, fields))
}

fn step_name(field_values: &Map<String, Value>) -> Result<String, ConstructionError> {
    match field_values.get("name") {
        None => Err(ConstructionError::MissingRequiredField {
            field: "name".into(),
        }),
        Some(Value::String(name)) if !name.is_empty() => Ok(name.clone()),
        Some(other) => Err(ConstructionError::WrongLiteralType {
            field: "name".into(),
            expected: "non-empty string".into(),
            received: describe_value(other),
        }),
    }
}

/// Classify one provided value as selector or literal and check it against
/// the field's binding mode and value domain.
fn field_value(
    kind: StepKind,
    spec: &FieldSpec,
    value: &Value,
) -> Result<FieldValue, ConstructionError> {
    if let Some(raw) = value.as_str().filter(|s| looks_like_selector(s)) {
        if !spec.selectable() {
            return Err(ConstructionError::SelectorNotAllowed {
                kind,
                field: spec.name.to_string(),
            });
        }
        let selector = Selector::parse(raw).map_err(|source| ConstructionError::InvalidSelector {
            field: spec.name.to_string(),
            selector: raw.to_string(),
            source,
        })?;
        return Ok(FieldValue::Selector(selector));
    }

    if !spec.binding.accepts_literal() {
        return Err(ConstructionError::LiteralNotAllowed {
            kind,
            field: spec.name.to_string(),
            received: describe_value(value),
        });
    }

    let null_rejected = value.is_null() && spec.required;
    if null_rejected || !spec.value_domain.accepts(value) {
        return Err(ConstructionError::WrongLiteralType {
            field: spec.name.to_string(),
            expected: spec.value_domain.describe().to_string(),
            received: describe_value(value),
        });
    }

    Ok(FieldValue::Literal(value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("Expected object, got {:?}", other),
        }
    }

    #[test]
    fn minimal_classification() {
        let step = construct(
            "ClassificationModel",
            &fields(json!({"name": "some", "image": "$inputs.image", "model_id": "some/1"})),
        )
        .unwrap();
        assert_eq!(step.kind(), StepKind::ClassificationModel);
        assert_eq!(step.name(), "some");
        assert_eq!(
            step.field("image"),
            Some(&FieldValue::Selector(Selector::input("image")))
        );
        assert_eq!(
            step.field("model_id"),
            Some(&FieldValue::Literal(json!("some/1")))
        );
        assert_eq!(step.field("confidence"), None);
        assert_eq!(
            step.effective_value("confidence"),
            Some(FieldValue::Literal(json!(0.4)))
        );
    }

    #[test]
    fn type_entry_must_repeat_tag() {
        let ok = construct(
            "Crop",
            &fields(json!({
                "type": "Crop",
                "name": "crop",
                "image": "$inputs.image",
                "detections": "$steps.detect.predictions"
            })),
        );
        assert!(ok.is_ok());

        let err = construct(
            "Crop",
            &fields(json!({
                "type": "ObjectDetectionModel",
                "name": "crop",
                "image": "$inputs.image",
                "detections": "$steps.detect.predictions"
            })),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::UnrecognizedKind {
                tag: "ObjectDetectionModel".into()
            }
        );
    }

    #[test]
    fn unknown_field_rejected() {
        let err = construct(
            "ClassificationModel",
            &fields(json!({
                "name": "some",
                "image": "$inputs.image",
                "model_id": "some/1",
                "iou_threshold": 0.5
            })),
        )
        .unwrap_err();
        assert_eq!(err.code(), "C004");
    }

    #[test]
    fn empty_name_rejected() {
        let err = construct(
            "ClassificationModel",
            &fields(json!({"name": "", "image": "$inputs.image", "model_id": "some/1"})),
        )
        .unwrap_err();
        assert!(
            matches!(err, ConstructionError::WrongLiteralType { field, .. } if field == "name")
        );
    }

    #[test]
    fn selector_on_literal_only_field() {
        let err = construct(
            "ClassificationModel",
            &fields(json!({
                "name": "some",
                "image": "$inputs.image",
                "model_id": "some/1",
                "confidence": "$inputs.confidence"
            })),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::SelectorNotAllowed {
                kind: StepKind::ClassificationModel,
                field: "confidence".into()
            }
        );
    }

    #[test]
    fn literal_on_selector_only_field() {
        let err = construct(
            "ClassificationModel",
            &fields(json!({"name": "some", "image": "some", "model_id": "some/1"})),
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @r#"ClassificationModel field 'image' must be a selector, received literal string "some""#
        );
    }

    #[test]
    fn malformed_selector() {
        let err = construct(
            "ClassificationModel",
            &fields(json!({"name": "some", "image": "$input.image", "model_id": "some/1"})),
        )
        .unwrap_err();
        assert_eq!(err.code(), "C005");
    }

    #[test]
    fn literal_out_of_domain() {
        let err = construct(
            "ObjectDetectionModel",
            &fields(json!({
                "name": "detect",
                "image": "$inputs.image",
                "model_id": "some/1",
                "iou_threshold": 1.5
            })),
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Field 'iou_threshold' expects number in [0.0, 1.0], received float 1.5"
        );
    }

    #[test]
    fn optional_null_only_where_domain_allows() {
        let ok = construct(
            "ObjectDetectionModel",
            &fields(json!({
                "name": "detect",
                "image": "$inputs.image",
                "model_id": "some/1",
                "class_filter": null
            })),
        );
        assert!(ok.is_ok());

        let err = construct(
            "ObjectDetectionModel",
            &fields(json!({
                "name": "detect",
                "image": "$inputs.image",
                "model_id": "some/1",
                "confidence": null
            })),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConstructionError::WrongLiteralType { field, .. } if field == "confidence"
        ));
    }
}
