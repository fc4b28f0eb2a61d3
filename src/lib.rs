//! Feature flag evaluation engine.
//!
//! Decides which value of a [`FeatureFlag`] a [`User`] receives: variations are checked in
//! order for a [`TargetRule`] matching the user, and when none matches, the user is placed
//! into a variation by a deterministic, hash-based percentage rollout.

#![warn(missing_docs)]

#[macro_use]
mod macros;
mod constants;
mod errors;
mod eval;
mod model;
mod user;
mod utils;
mod value;

pub use constants::PKG_VERSION;
pub use errors::{ConfigError, ErrorKind};
pub use eval::bucketing::{allocate, bucket};
pub use eval::details::{EvaluationDetails, EvaluationReason};
pub use eval::evaluator::{evaluate, evaluate_details};
pub use eval::matcher::matches;

pub use model::flag::{FeatureFlag, FlagBuilder, TargetRule, Variation};

pub use user::{User, UserValue};
pub use value::{Value, ValuePrimitive};
