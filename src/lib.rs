//! Type-checking core of the deployments workflow language.
//!
//! Steps are constructed from JSON definitions against a static schema
//! registry, their selector wiring is checked against the kinds of upstream
//! nodes, and runtime values are checked against each field's value domain.

pub mod error;
pub mod parse;
pub mod registry;
pub mod validate;
pub mod wasm;

pub use error::{
    BindingError, ConstructionError, DeploymentError, Diagnostic, ExecutionGraphError,
    InvalidStepInputDetected, Phase, SelectorError, VariableTypeError,
};
pub use parse::{
    FieldValue, InputKind, InputNode, NodeDescriptor, NodeKind, Selector, SourceNode,
    StepInstance, StepKind,
};
pub use registry::{FieldBinding, FieldSpec, StepOutput, StepSchema, ValueDomain};
pub use validate::{construct, validate_field_binding, validate_field_selector};
