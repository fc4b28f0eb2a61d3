use crate::TargetRule;
use std::fmt::{Display, Formatter};

/// Describes why an evaluation produced its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluationReason {
    /// The flag is turned off, no value was served.
    Off,
    /// The user has no key, no value was served.
    MissingUserKey,
    /// A target rule matched the user.
    TargetMatch {
        /// Index of the served variation.
        variation_index: usize,
        /// Index of the matching rule within the variation.
        rule_index: usize,
    },
    /// No target rule matched, the variation was selected by percentage rollout.
    Rollout {
        /// Index of the served variation.
        variation_index: usize,
        /// The user's rollout bucket, between 0 and 100.
        bucket: f64,
    },
}

impl EvaluationReason {
    /// Index of the served variation, [`None`] when no value was served.
    pub fn variation_index(&self) -> Option<usize> {
        match self {
            EvaluationReason::Off | EvaluationReason::MissingUserKey => None,
            EvaluationReason::TargetMatch {
                variation_index, ..
            }
            | EvaluationReason::Rollout {
                variation_index, ..
            } => Some(*variation_index),
        }
    }
}

impl Display for EvaluationReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationReason::Off => f.write_str("no value (the flag is off)"),
            EvaluationReason::MissingUserKey => f.write_str("no value (the user key is missing)"),
            EvaluationReason::TargetMatch {
                variation_index,
                rule_index,
            } => write!(
                f,
                "variation #{variation_index} (target rule #{rule_index} matched)"
            ),
            EvaluationReason::Rollout {
                variation_index,
                bucket,
            } => write!(
                f,
                "variation #{variation_index} (percentage rollout, bucket {bucket:.4})"
            ),
        }
    }
}

/// Details of the flag evaluation's result.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationDetails<T> {
    /// The served value, [`None`] when the flag is off or the user has no key.
    pub value: Option<T>,
    /// Key of the evaluated flag.
    pub key: String,
    /// Describes how the value was selected.
    pub reason: EvaluationReason,
    /// The target rule (if any) that matched during the evaluation.
    pub matched_target_rule: Option<TargetRule>,
}

impl<T> EvaluationDetails<T> {
    pub(crate) fn empty(key: &str, reason: EvaluationReason) -> Self {
        Self {
            value: None,
            key: key.to_owned(),
            reason,
            matched_target_rule: None,
        }
    }
}
