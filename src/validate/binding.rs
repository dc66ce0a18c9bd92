//! Dynamic check: does a resolved runtime value satisfy the field's domain?

use serde_json::Value;
use tracing::{debug, instrument};

use super::selector::field_spec;
use crate::error::{BindingError, VariableTypeError};
use crate::parse::step::StepInstance;
use crate::registry::domain::describe_value;

/// Check a concrete value (literal, or what a selector resolved to) against
/// the field's value domain. Selector syntax is never looked at here.
#[instrument(level = "debug", skip_all, fields(step = step.name(), field = field_name))]
pub fn validate_field_binding(
    step: &StepInstance,
    field_name: &str,
    value: &Value,
) -> Result<(), BindingError> {
    let spec = field_spec(step, field_name)?;

    if spec.value_domain.accepts(value) {
        return Ok(());
    }

    let err = VariableTypeError {
        step: step.name().to_string(),
        field: field_name.to_string(),
        expected: spec.value_domain.describe().to_string(),
        received: describe_value(value),
    };
    debug!(error = %err, "binding rejected");
    Err(err.into())
}
