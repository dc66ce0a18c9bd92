//! Step schema registry.
//!
//! Every step kind owns a fixed table of [`FieldSpec`]s. The tables are
//! `static` data, immutable for the life of the process and safe to read
//! from any number of threads.

pub mod domain;
mod schemas;

use std::collections::BTreeSet;

use serde::{Serialize, Serializer};

pub use domain::{FieldDefault, ValueDomain};

use crate::error::ConstructionError;
use crate::parse::types::{NodeKind, StepKind};

/// Fields every step definition carries regardless of kind.
pub const ENVELOPE_FIELDS: [&str; 2] = ["type", "name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldBinding {
    /// Must be wired to an upstream node.
    SelectorOnly,
    /// Must be configured inline.
    LiteralOnly,
    SelectorOrLiteral,
}

impl FieldBinding {
    pub fn is_selectable(&self) -> bool {
        !matches!(self, FieldBinding::LiteralOnly)
    }

    pub fn accepts_literal(&self) -> bool {
        !matches!(self, FieldBinding::SelectorOnly)
    }
}

/// A named output of a step kind, written `Kind.output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepOutput {
    pub kind: StepKind,
    pub output: &'static str,
}

impl std::fmt::Display for StepOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.kind, self.output)
    }
}

impl Serialize for StepOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub binding: FieldBinding,
    /// Kinds a selector on this field may point at. Empty for literal-only fields.
    pub accepted_source_kinds: &'static [NodeKind],
    /// Outputs a `$steps.<name>.<output>` selector may name. Every step kind in
    /// `accepted_source_kinds` appears here at least once.
    pub accepted_outputs: &'static [StepOutput],
    pub value_domain: ValueDomain,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub fn selectable(&self) -> bool {
        self.binding.is_selectable()
    }

    pub fn accepts_source(&self, kind: NodeKind) -> bool {
        self.accepted_source_kinds.contains(&kind)
    }

    pub fn accepts_output(&self, kind: StepKind, output: &str) -> bool {
        self.accepted_outputs
            .iter()
            .any(|accepted| accepted.kind == kind && accepted.output == output)
    }
}

#[derive(Debug)]
pub struct StepSchema {
    pub kind: StepKind,
    pub fields: &'static [FieldSpec],
    pub outputs: &'static [&'static str],
}

impl StepSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains(&name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

impl StepKind {
    pub fn schema(self) -> &'static StepSchema {
        schemas::schema_for(self)
    }
}

/// All registered schemas, in registration order.
pub fn schemas() -> impl Iterator<Item = &'static StepSchema> {
    StepKind::ALL.into_iter().map(StepKind::schema)
}

pub fn get_field_spec(
    kind: StepKind,
    field_name: &str,
) -> Result<&'static FieldSpec, ConstructionError> {
    kind.schema()
        .field(field_name)
        .ok_or_else(|| ConstructionError::UnknownField {
            kind,
            field: field_name.to_string(),
        })
}

/// Names a definition of `kind` must provide, envelope fields included.
pub fn required_fields(kind: StepKind) -> BTreeSet<&'static str> {
    ENVELOPE_FIELDS
        .into_iter()
        .chain(kind.schema().required_fields().map(|f| f.name))
        .collect()
}

/// Tag and presence check only: the part of construction that needs nothing
/// but field names.
pub fn minimal_construction(
    tag: &str,
    provided_fields: &[&str],
) -> Result<StepKind, ConstructionError> {
    let kind: StepKind = tag.parse()?;
    for required in ENVELOPE_FIELDS
        .into_iter()
        .filter(|f| *f != "type")
        .chain(kind.schema().required_fields().map(|f| f.name))
    {
        if !provided_fields.contains(&required) {
            return Err(ConstructionError::MissingRequiredField {
                field: required.to_string(),
            });
        }
    }
    Ok(kind)
}

// =============================================================================
// MANIFEST
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegistryManifest {
    pub steps: Vec<StepManifest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepManifest {
    pub kind: StepKind,
    pub fields: Vec<FieldManifest>,
    pub outputs: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldManifest {
    pub name: &'static str,
    pub required: bool,
    pub binding: FieldBinding,
    pub accepted_source_kinds: Vec<NodeKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accepted_outputs: Vec<StepOutput>,
    pub value_domain: ValueDomain,
    pub expected: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl From<&StepSchema> for StepManifest {
    fn from(schema: &StepSchema) -> Self {
        StepManifest {
            kind: schema.kind,
            fields: schema.fields.iter().map(FieldManifest::from).collect(),
            outputs: schema.outputs.to_vec(),
        }
    }
}

impl From<&FieldSpec> for FieldManifest {
    fn from(spec: &FieldSpec) -> Self {
        FieldManifest {
            name: spec.name,
            required: spec.required,
            binding: spec.binding,
            accepted_source_kinds: spec.accepted_source_kinds.to_vec(),
            accepted_outputs: spec.accepted_outputs.to_vec(),
            value_domain: spec.value_domain,
            expected: spec.value_domain.describe(),
            default: spec.default.to_value(),
        }
    }
}

/// Serializable description of every registered step kind.
pub fn describe() -> RegistryManifest {
    RegistryManifest {
        steps: schemas().map(StepManifest::from).collect(),
    }
}
