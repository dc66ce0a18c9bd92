//! Kinds of graph nodes and the workflow-input node types.
//!
//! Step kinds and input kinds share one namespace of tags: every tag is the
//! exact, case-sensitive `type` discriminator of a definition.
//! SYNC NOTE: adding a `StepKind` variant requires a schema in
//! `registry/schemas.rs` and an entry in `StepKind::ALL`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConstructionError;

// =============================================================================
// STEP KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    ClassificationModel,
    MultiLabelClassificationModel,
    ObjectDetectionModel,
    Crop,
}

impl StepKind {
    /// Registration order.
    pub const ALL: [StepKind; 4] = [
        StepKind::ClassificationModel,
        StepKind::MultiLabelClassificationModel,
        StepKind::ObjectDetectionModel,
        StepKind::Crop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::ClassificationModel => "ClassificationModel",
            StepKind::MultiLabelClassificationModel => "MultiLabelClassificationModel",
            StepKind::ObjectDetectionModel => "ObjectDetectionModel",
            StepKind::Crop => "Crop",
        }
    }

    /// Exact tag match. No case folding, no fuzzy matching.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepKind {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ConstructionError::UnrecognizedKind { tag: s.into() })
    }
}

// =============================================================================
// INPUT KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    InferenceImage,
    InferenceParameter,
}

impl InputKind {
    pub const ALL: [InputKind; 2] = [InputKind::InferenceImage, InputKind::InferenceParameter];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::InferenceImage => "InferenceImage",
            InputKind::InferenceParameter => "InferenceParameter",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NODE KINDS
// =============================================================================

/// Declared output kind of any node a selector can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKind {
    Input(InputKind),
    Step(StepKind),
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Input(kind) => kind.as_str(),
            NodeKind::Step(kind) => kind.as_str(),
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        InputKind::from_tag(tag)
            .map(NodeKind::Input)
            .or_else(|| StepKind::from_tag(tag).map(NodeKind::Step))
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<InputKind> for NodeKind {
    fn from(kind: InputKind) -> Self {
        NodeKind::Input(kind)
    }
}

impl From<StepKind> for NodeKind {
    fn from(kind: StepKind) -> Self {
        NodeKind::Step(kind)
    }
}

impl FromStr for NodeKind {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ConstructionError::UnrecognizedKind { tag: s.into() })
    }
}

// =============================================================================
// SOURCE NODES
// =============================================================================

/// Anything a selector can resolve to.
pub trait SourceNode {
    fn declared_output_kind(&self) -> NodeKind;
}

impl SourceNode for NodeKind {
    fn declared_output_kind(&self) -> NodeKind {
        *self
    }
}

/// Upstream node as handed over by the graph builder once it has linked a
/// selector to its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub name: String,
    pub declared_kind: NodeKind,
}

impl SourceNode for NodeDescriptor {
    fn declared_output_kind(&self) -> NodeKind {
        self.declared_kind
    }
}

// =============================================================================
// INPUT NODES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputNode {
    InferenceImage(ImageInput),
    InferenceParameter(ParameterInput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl InputNode {
    pub fn image(name: impl Into<String>) -> Self {
        InputNode::InferenceImage(ImageInput { name: name.into() })
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        InputNode::InferenceParameter(ParameterInput {
            name: name.into(),
            default_value: None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            InputNode::InferenceImage(n) => &n.name,
            InputNode::InferenceParameter(n) => &n.name,
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            InputNode::InferenceImage(_) => InputKind::InferenceImage,
            InputNode::InferenceParameter(_) => InputKind::InferenceParameter,
        }
    }
}

impl SourceNode for InputNode {
    fn declared_output_kind(&self) -> NodeKind {
        NodeKind::Input(self.kind())
    }
}
