//! Parse `$inputs.<name>` and `$steps.<name>.<output>` selector strings.

use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

pub const SELECTOR_PREFIX: char = '$';

const INPUTS_ROOT: &str = "inputs";
const STEPS_ROOT: &str = "steps";

/// Reference binding a step field to a workflow input or another step's output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Input { name: String },
    StepOutput { step: String, output: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorSyntaxError {
    #[error("selector must start with '$'")]
    MissingPrefix,

    #[error("unknown selector root '{root}' (expected 'inputs' or 'steps')")]
    UnknownRoot { root: String },

    #[error("'{root}' selector expects {expected} segment(s) after the root, found {found}")]
    SegmentCount {
        root: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid selector segment '{segment}'")]
    InvalidSegment { segment: String },
}

/// Whether a raw string is meant as a selector. Such strings must then parse.
pub fn looks_like_selector(raw: &str) -> bool {
    raw.starts_with(SELECTOR_PREFIX)
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, SelectorSyntaxError> {
        let body = raw
            .strip_prefix(SELECTOR_PREFIX)
            .ok_or(SelectorSyntaxError::MissingPrefix)?;

        let (root, rest) = split_root(body);
        let segments: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('.').collect()
        };
        if let Some(bad) = segments.iter().find(|s| !is_valid_segment(s)) {
            return Err(SelectorSyntaxError::InvalidSegment {
                segment: bad.to_string(),
            });
        }

        match root {
            INPUTS_ROOT => match segments.as_slice() {
                [name] => Ok(Selector::Input {
                    name: name.to_string(),
                }),
                _ => Err(SelectorSyntaxError::SegmentCount {
                    root: INPUTS_ROOT,
                    expected: 1,
                    found: segments.len(),
                }),
            },
            STEPS_ROOT => match segments.as_slice() {
                [step, output] => Ok(Selector::StepOutput {
                    step: step.to_string(),
                    output: output.to_string(),
                }),
                _ => Err(SelectorSyntaxError::SegmentCount {
                    root: STEPS_ROOT,
                    expected: 2,
                    found: segments.len(),
                }),
            },
            other => Err(SelectorSyntaxError::UnknownRoot { root: other.into() }),
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Selector::Input { name: name.into() }
    }

    pub fn step_output(step: impl Into<String>, output: impl Into<String>) -> Self {
        Selector::StepOutput {
            step: step.into(),
            output: output.into(),
        }
    }

    /// Name of the input or step the selector points at.
    pub fn source_name(&self) -> &str {
        match self {
            Selector::Input { name } => name,
            Selector::StepOutput { step, .. } => step,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Selector::Input { .. })
    }
}

fn split_root(s: &str) -> (&str, &str) {
    match s.find('.') {
        Some(pos) => (&s[..pos], &s[pos + 1..]),
        None => (s, ""),
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Input { name } => write!(f, "${INPUTS_ROOT}.{name}"),
            Selector::StepOutput { step, output } => write!(f, "${STEPS_ROOT}.{step}.{output}"),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
