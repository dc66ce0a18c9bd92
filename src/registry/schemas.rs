//! Field tables of every registered step kind.
//! SYNC NOTE: match arms in `schema_for` must cover every `StepKind`.

use super::domain::{FieldDefault, ValueDomain};
use super::{FieldBinding, FieldSpec, StepOutput, StepSchema};
use crate::parse::types::{InputKind, NodeKind, StepKind};

const IMAGE_SOURCES: &[NodeKind] = &[
    NodeKind::Input(InputKind::InferenceImage),
    NodeKind::Step(StepKind::Crop),
];

const PARAMETER_SOURCES: &[NodeKind] = &[NodeKind::Input(InputKind::InferenceParameter)];

const DETECTION_SOURCES: &[NodeKind] = &[NodeKind::Step(StepKind::ObjectDetectionModel)];

const IMAGE_OUTPUTS: &[StepOutput] = &[StepOutput {
    kind: StepKind::Crop,
    output: "crops",
}];

const DETECTION_OUTPUTS: &[StepOutput] = &[StepOutput {
    kind: StepKind::ObjectDetectionModel,
    output: "predictions",
}];

// =============================================================================
// SHARED FIELDS
// =============================================================================

const IMAGE: FieldSpec = FieldSpec {
    name: "image",
    required: true,
    binding: FieldBinding::SelectorOnly,
    accepted_source_kinds: IMAGE_SOURCES,
    accepted_outputs: IMAGE_OUTPUTS,
    value_domain: ValueDomain::Image,
    default: FieldDefault::None,
};

const MODEL_ID: FieldSpec = FieldSpec {
    name: "model_id",
    required: true,
    binding: FieldBinding::SelectorOrLiteral,
    accepted_source_kinds: PARAMETER_SOURCES,
    accepted_outputs: &[],
    value_domain: ValueDomain::NonEmptyString,
    default: FieldDefault::None,
};

const DISABLE_ACTIVE_LEARNING: FieldSpec = FieldSpec {
    name: "disable_active_learning",
    required: false,
    binding: FieldBinding::SelectorOrLiteral,
    accepted_source_kinds: PARAMETER_SOURCES,
    accepted_outputs: &[],
    value_domain: ValueDomain::Boolean,
    default: FieldDefault::Bool(false),
};

const CONFIDENCE: FieldSpec = FieldSpec {
    name: "confidence",
    required: false,
    binding: FieldBinding::LiteralOnly,
    accepted_source_kinds: &[],
    accepted_outputs: &[],
    value_domain: ValueDomain::UnitInterval,
    default: FieldDefault::Float(0.4),
};

// =============================================================================
// CLASSIFICATION
// =============================================================================

static CLASSIFICATION_MODEL: StepSchema = StepSchema {
    kind: StepKind::ClassificationModel,
    fields: &[IMAGE, MODEL_ID, DISABLE_ACTIVE_LEARNING, CONFIDENCE],
    outputs: &[
        "predictions",
        "top",
        "confidence",
        "parent_id",
        "prediction_type",
    ],
};

static MULTI_LABEL_CLASSIFICATION_MODEL: StepSchema = StepSchema {
    kind: StepKind::MultiLabelClassificationModel,
    fields: &[IMAGE, MODEL_ID, DISABLE_ACTIVE_LEARNING, CONFIDENCE],
    outputs: &[
        "predictions",
        "predicted_classes",
        "parent_id",
        "prediction_type",
    ],
};

// =============================================================================
// OBJECT DETECTION
// =============================================================================

static OBJECT_DETECTION_MODEL: StepSchema = StepSchema {
    kind: StepKind::ObjectDetectionModel,
    fields: &[
        IMAGE,
        MODEL_ID,
        DISABLE_ACTIVE_LEARNING,
        CONFIDENCE,
        FieldSpec {
            name: "class_agnostic_nms",
            required: false,
            binding: FieldBinding::SelectorOrLiteral,
            accepted_source_kinds: PARAMETER_SOURCES,
            accepted_outputs: &[],
            value_domain: ValueDomain::Boolean,
            default: FieldDefault::Bool(false),
        },
        FieldSpec {
            name: "class_filter",
            required: false,
            binding: FieldBinding::SelectorOrLiteral,
            accepted_source_kinds: PARAMETER_SOURCES,
            accepted_outputs: &[],
            value_domain: ValueDomain::StringListOrNull,
            default: FieldDefault::Null,
        },
        FieldSpec {
            name: "iou_threshold",
            required: false,
            binding: FieldBinding::LiteralOnly,
            accepted_source_kinds: &[],
            accepted_outputs: &[],
            value_domain: ValueDomain::UnitInterval,
            default: FieldDefault::Float(0.3),
        },
        FieldSpec {
            name: "max_detections",
            required: false,
            binding: FieldBinding::SelectorOrLiteral,
            accepted_source_kinds: PARAMETER_SOURCES,
            accepted_outputs: &[],
            value_domain: ValueDomain::PositiveInteger,
            default: FieldDefault::Integer(300),
        },
        FieldSpec {
            name: "max_candidates",
            required: false,
            binding: FieldBinding::SelectorOrLiteral,
            accepted_source_kinds: PARAMETER_SOURCES,
            accepted_outputs: &[],
            value_domain: ValueDomain::PositiveInteger,
            default: FieldDefault::Integer(3000),
        },
    ],
    outputs: &["predictions", "parent_id", "image", "prediction_type"],
};

// =============================================================================
// TRANSFORMS
// =============================================================================

static CROP: StepSchema = StepSchema {
    kind: StepKind::Crop,
    fields: &[
        IMAGE,
        FieldSpec {
            name: "detections",
            required: true,
            binding: FieldBinding::SelectorOnly,
            accepted_source_kinds: DETECTION_SOURCES,
            accepted_outputs: DETECTION_OUTPUTS,
            value_domain: ValueDomain::Detections,
            default: FieldDefault::None,
        },
    ],
    outputs: &["crops", "parent_id"],
};

pub(super) fn schema_for(kind: StepKind) -> &'static StepSchema {
    match kind {
        StepKind::ClassificationModel => &CLASSIFICATION_MODEL,
        StepKind::MultiLabelClassificationModel => &MULTI_LABEL_CLASSIFICATION_MODEL,
        StepKind::ObjectDetectionModel => &OBJECT_DETECTION_MODEL,
        StepKind::Crop => &CROP,
    }
}
