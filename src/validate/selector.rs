//! Static wiring check: does a selector on a step field point at a node of an
//! accepted kind?

use tracing::{debug, instrument};

use crate::error::{ExecutionGraphError, InvalidStepInputDetected, SelectorError};
use crate::parse::selector::Selector;
use crate::parse::step::{FieldValue, StepInstance};
use crate::parse::types::{NodeKind, SourceNode};
use crate::registry::FieldSpec;

/// Check the selector attached to `field_name` against the node it resolves to.
///
/// Field existence, selectability and the presence of a selector are graph
/// shape problems ([`ExecutionGraphError`]). A kind outside the field's accepted
/// set, or a step output the field does not take, is attributable to the edge
/// ([`InvalidStepInputDetected`]).
#[instrument(level = "debug", skip_all, fields(step = step.name(), field = field_name))]
pub fn validate_field_selector<S: SourceNode + ?Sized>(
    step: &StepInstance,
    field_name: &str,
    source_node: &S,
) -> Result<(), SelectorError> {
    let result = check(step, field_name, source_node);
    if let Err(e) = &result {
        debug!(code = e.code(), error = %e, "selector rejected");
    }
    result
}

fn check<S: SourceNode + ?Sized>(
    step: &StepInstance,
    field_name: &str,
    source_node: &S,
) -> Result<(), SelectorError> {
    let spec = field_spec(step, field_name)?;

    if !spec.selectable() {
        return Err(ExecutionGraphError::FieldNotSelectable {
            step: step.name().to_string(),
            field: field_name.to_string(),
        }
        .into());
    }

    let Some(FieldValue::Selector(selector)) = step.field(field_name) else {
        return Err(ExecutionGraphError::NoSelectorBound {
            step: step.name().to_string(),
            field: field_name.to_string(),
        }
        .into());
    };

    let received = source_node.declared_output_kind();
    let received_output = match selector {
        Selector::StepOutput { output, .. } => Some(output.as_str()),
        Selector::Input { .. } => None,
    };
    if !accepts(spec, received, received_output) {
        return Err(InvalidStepInputDetected {
            step: step.name().to_string(),
            kind: step.kind(),
            field: field_name.to_string(),
            expected: spec.accepted_source_kinds.to_vec(),
            accepted_outputs: spec.accepted_outputs.to_vec(),
            received,
            received_output: received_output.map(str::to_string),
        }
        .into());
    }

    Ok(())
}

/// The node kind must be accepted, and the selector shape must match it: an
/// input selector resolves to an input, a step selector to one of the field's
/// accepted outputs of that step kind.
fn accepts(spec: &FieldSpec, received: NodeKind, output: Option<&str>) -> bool {
    if !spec.accepts_source(received) {
        return false;
    }
    match (received, output) {
        (NodeKind::Input(_), None) => true,
        (NodeKind::Step(kind), Some(output)) => spec.accepts_output(kind, output),
        _ => false,
    }
}

/// Field lookup shared by the wiring and binding checks. An unknown field is a
/// wiring defect, never a type error.
pub(crate) fn field_spec(
    step: &StepInstance,
    field_name: &str,
) -> Result<&'static FieldSpec, ExecutionGraphError> {
    step.kind()
        .schema()
        .field(field_name)
        .ok_or_else(|| ExecutionGraphError::UnknownField {
            step: step.name().to_string(),
            kind: step.kind(),
            field: field_name.to_string(),
        })
}
