//! Error taxonomy shared by step construction, wiring checks and binding checks.
//!
//! Three families never overlap:
//! - [`ConstructionError`]: the step definition itself is malformed.
//! - [`ExecutionGraphError`]: the graph wiring refers to a field incorrectly.
//! - [`InvalidStepInputDetected`] / [`VariableTypeError`]: a well-formed edge or binding
//!   carries the wrong kind of node or value.
//!
//! Every error flattens into a [`Diagnostic`] for tooling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parse::selector::SelectorSyntaxError;
use crate::parse::types::{NodeKind, StepKind};
use crate::registry::StepOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Construct,
    Wiring,
    Binding,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Construct => write!(f, "Construct"),
            Phase::Wiring => write!(f, "Wiring"),
            Phase::Binding => write!(f, "Binding"),
        }
    }
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

/// The step definition is structurally malformed. Raised before any selector
/// or binding check can run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("Unrecognized node kind '{tag}'")]
    UnrecognizedKind { tag: String },

    #[error("Missing required field '{field}'")]
    MissingRequiredField { field: String },

    #[error("Field '{field}' expects {expected}, received {received}")]
    WrongLiteralType {
        field: String,
        expected: String,
        received: String,
    },

    #[error("{kind} has no field '{field}'")]
    UnknownField { kind: StepKind, field: String },

    #[error("Field '{field}' holds malformed selector '{selector}': {source}")]
    InvalidSelector {
        field: String,
        selector: String,
        source: SelectorSyntaxError,
    },

    #[error("{kind} field '{field}' must be a literal, selectors are not allowed")]
    SelectorNotAllowed { kind: StepKind, field: String },

    #[error("{kind} field '{field}' must be a selector, received literal {received}")]
    LiteralNotAllowed {
        kind: StepKind,
        field: String,
        received: String,
    },

    #[error("Malformed step definition: {details}")]
    MalformedDefinition { details: String },
}

impl ConstructionError {
    pub fn code(&self) -> &'static str {
        match self {
            ConstructionError::UnrecognizedKind { .. } => "C001",
            ConstructionError::MissingRequiredField { .. } => "C002",
            ConstructionError::WrongLiteralType { .. } => "C003",
            ConstructionError::UnknownField { .. } => "C004",
            ConstructionError::InvalidSelector { .. } => "C005",
            ConstructionError::SelectorNotAllowed { .. } => "C006",
            ConstructionError::LiteralNotAllowed { .. } => "C007",
            ConstructionError::MalformedDefinition { .. } => "C008",
        }
    }
}

// =============================================================================
// WIRING
// =============================================================================

/// The graph wiring references a step field incorrectly. Always an authoring
/// defect; aborts graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionGraphError {
    #[error("Step '{step}' ({kind}) has no field '{field}'")]
    UnknownField {
        step: String,
        kind: StepKind,
        field: String,
    },

    #[error("Step '{step}' field '{field}' does not accept selectors")]
    FieldNotSelectable { step: String, field: String },

    #[error("Attempted to validate selector for step '{step}' field '{field}', but the field does not hold a selector")]
    NoSelectorBound { step: String, field: String },

    #[error("Step '{step}' is wired to a node of unrecognized kind '{tag}'")]
    UnknownSourceKind { step: String, tag: String },
}

impl ExecutionGraphError {
    pub fn code(&self) -> &'static str {
        match self {
            ExecutionGraphError::UnknownField { .. } => "G001",
            ExecutionGraphError::FieldNotSelectable { .. } => "G002",
            ExecutionGraphError::NoSelectorBound { .. } => "G003",
            ExecutionGraphError::UnknownSourceKind { .. } => "G004",
        }
    }

    pub fn step(&self) -> &str {
        match self {
            ExecutionGraphError::UnknownField { step, .. }
            | ExecutionGraphError::FieldNotSelectable { step, .. }
            | ExecutionGraphError::NoSelectorBound { step, .. }
            | ExecutionGraphError::UnknownSourceKind { step, .. } => step,
        }
    }
}

/// A selector on a selectable field points at a node, or a step output, the
/// field does not accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Step '{step}' ({kind}) field '{field}' accepts selectors to [{}], but the selector points at {}",
    describe_accepted(.expected, .accepted_outputs),
    describe_received(.received, .received_output)
)]
pub struct InvalidStepInputDetected {
    pub step: String,
    pub kind: StepKind,
    pub field: String,
    pub expected: Vec<NodeKind>,
    pub accepted_outputs: Vec<StepOutput>,
    pub received: NodeKind,
    /// Output named by a `$steps.<name>.<output>` selector.
    pub received_output: Option<String>,
}

fn describe_accepted(kinds: &[NodeKind], outputs: &[StepOutput]) -> String {
    let mut accepted = Vec::new();
    for kind in kinds {
        match kind {
            NodeKind::Input(input) => accepted.push(input.to_string()),
            NodeKind::Step(step) => accepted.extend(
                outputs
                    .iter()
                    .filter(|o| o.kind == *step)
                    .map(StepOutput::to_string),
            ),
        }
    }
    accepted.join(", ")
}

fn describe_received(kind: &NodeKind, output: &Option<String>) -> String {
    match output {
        Some(output) => format!("{}.{}", kind, output),
        None => kind.to_string(),
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// A concrete runtime value violates the field's value domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Step '{step}' field '{field}' expects {expected}, received {received}")]
pub struct VariableTypeError {
    pub step: String,
    pub field: String,
    pub expected: String,
    pub received: String,
}

/// Failure of `validate_field_selector`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error(transparent)]
    ExecutionGraph(#[from] ExecutionGraphError),

    #[error(transparent)]
    InvalidStepInput(#[from] InvalidStepInputDetected),
}

impl SelectorError {
    pub fn code(&self) -> &'static str {
        match self {
            SelectorError::ExecutionGraph(e) => e.code(),
            SelectorError::InvalidStepInput(_) => "S001",
        }
    }
}

/// Failure of `validate_field_binding`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error(transparent)]
    ExecutionGraph(#[from] ExecutionGraphError),

    #[error(transparent)]
    VariableType(#[from] VariableTypeError),
}

impl BindingError {
    pub fn code(&self) -> &'static str {
        match self {
            BindingError::ExecutionGraph(e) => e.code(),
            BindingError::VariableType(_) => "B001",
        }
    }
}

// =============================================================================
// UMBRELLA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    ExecutionGraph(#[from] ExecutionGraphError),

    #[error(transparent)]
    InvalidStepInput(#[from] InvalidStepInputDetected),

    #[error(transparent)]
    VariableType(#[from] VariableTypeError),
}

impl From<SelectorError> for DeploymentError {
    fn from(e: SelectorError) -> Self {
        match e {
            SelectorError::ExecutionGraph(e) => DeploymentError::ExecutionGraph(e),
            SelectorError::InvalidStepInput(e) => DeploymentError::InvalidStepInput(e),
        }
    }
}

impl From<BindingError> for DeploymentError {
    fn from(e: BindingError) -> Self {
        match e {
            BindingError::ExecutionGraph(e) => DeploymentError::ExecutionGraph(e),
            BindingError::VariableType(e) => DeploymentError::VariableType(e),
        }
    }
}

impl DeploymentError {
    pub fn code(&self) -> &'static str {
        match self {
            DeploymentError::Construction(e) => e.code(),
            DeploymentError::ExecutionGraph(e) => e.code(),
            DeploymentError::InvalidStepInput(_) => "S001",
            DeploymentError::VariableType(_) => "B001",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            DeploymentError::Construction(_) => Phase::Construct,
            DeploymentError::ExecutionGraph(_) | DeploymentError::InvalidStepInput(_) => {
                Phase::Wiring
            }
            DeploymentError::VariableType(_) => Phase::Binding,
        }
    }

    /// Name of the step the error is attributed to. Construction errors have
    /// none: the step never came into existence.
    pub fn step(&self) -> Option<&str> {
        match self {
            DeploymentError::Construction(_) => None,
            DeploymentError::ExecutionGraph(e) => Some(e.step()),
            DeploymentError::InvalidStepInput(e) => Some(&e.step),
            DeploymentError::VariableType(e) => Some(&e.step),
        }
    }
}

// =============================================================================
// DIAGNOSTIC
// =============================================================================

/// Flattened error record handed to tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub step: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.step {
            Some(step) => write!(
                f,
                "[{}:{}] {} (step '{}')",
                self.phase, self.code, self.message, step
            ),
            None => write!(f, "[{}:{}] {}", self.phase, self.code, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

impl From<DeploymentError> for Diagnostic {
    fn from(e: DeploymentError) -> Self {
        Diagnostic {
            code: e.code().to_string(),
            phase: e.phase(),
            message: e.to_string(),
            step: e.step().map(str::to_string),
        }
    }
}

impl Diagnostic {
    pub fn from_error(e: impl Into<DeploymentError>) -> Self {
        Diagnostic::from(e.into())
    }
}
