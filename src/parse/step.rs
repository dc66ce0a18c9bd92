//! Instantiated steps.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::selector::Selector;
use super::types::{NodeKind, SourceNode, StepKind};
use crate::error::{BindingError, SelectorError};

/// Value bound to a step field in a definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Selector(Selector),
    Literal(Value),
}

impl FieldValue {
    pub fn as_selector(&self) -> Option<&Selector> {
        match self {
            FieldValue::Selector(selector) => Some(selector),
            FieldValue::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            FieldValue::Literal(value) => Some(value),
            FieldValue::Selector(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Selector(selector) => Value::String(selector.to_string()),
            FieldValue::Literal(value) => value.clone(),
        }
    }
}

/// A step that passed structural validation. Only the fields present in the
/// definition are stored; defaults are resolved on read.
#[derive(Debug, Clone, PartialEq)]
pub struct StepInstance {
    kind: StepKind,
    name: String,
    fields: BTreeMap<String, FieldValue>,
}

impl StepInstance {
    /// Callers go through `validate::construct`, which guarantees the fields
    /// match the kind's schema.
    pub(crate) fn from_parts(
        kind: StepKind,
        name: String,
        fields: BTreeMap<String, FieldValue>,
    ) -> Self {
        StepInstance { kind, name, fields }
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value given in the definition, if any.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The value given in the definition, or the field's default.
    pub fn effective_value(&self, name: &str) -> Option<FieldValue> {
        if let Some(value) = self.fields.get(name) {
            return Some(value.clone());
        }
        self.kind
            .schema()
            .field(name)?
            .default
            .to_value()
            .map(FieldValue::Literal)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every selector-bound field, for the graph builder to link.
    pub fn selectors(&self) -> impl Iterator<Item = (&str, &Selector)> {
        self.fields
            .iter()
            .filter_map(|(k, v)| v.as_selector().map(|s| (k.as_str(), s)))
    }

    /// The definition this instance was built from.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(self.kind.as_str().into()));
        map.insert("name".into(), Value::String(self.name.clone()));
        for (field, value) in &self.fields {
            map.insert(field.clone(), value.to_value());
        }
        Value::Object(map)
    }

    pub fn validate_field_selector<S: SourceNode + ?Sized>(
        &self,
        field_name: &str,
        source_node: &S,
    ) -> Result<(), SelectorError> {
        crate::validate::validate_field_selector(self, field_name, source_node)
    }

    pub fn validate_field_binding(
        &self,
        field_name: &str,
        value: &Value,
    ) -> Result<(), BindingError> {
        crate::validate::validate_field_binding(self, field_name, value)
    }
}

impl SourceNode for StepInstance {
    fn declared_output_kind(&self) -> NodeKind {
        NodeKind::Step(self.kind)
    }
}

impl Serialize for StepInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
