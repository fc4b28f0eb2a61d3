use thiserror::Error;

/// Error kind that classifies the failures reported while building or loading a feature flag.
///
/// The numeric value of each kind is used as the `event_id` of the related log record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The evaluated user has no key.
    UserKeyMissing = 1000,
    /// A variation of the flag is invalid (e.g. it has a negative weight).
    InvalidVariation = 1001,
    /// A target rule of the flag is invalid (e.g. it has no comparison values).
    InvalidTargetRule = 1002,
    /// The sum of the variation weights is greater than 100.
    WeightSumExceeded = 1003,
    /// The flag definition is structurally invalid (e.g. it has no key or no variations).
    InvalidFlag = 1004,
    /// The flag definition could not be deserialized.
    DefinitionParseFailure = 1100,
    /// A variation value doesn't have the requested type.
    ValueTypeMismatch = 2001,
}

impl ErrorKind {
    pub(crate) fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// Error that describes why a feature flag definition was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The flag key is empty.
    #[error("The flag key must not be empty.")]
    EmptyKey,
    /// The flag has no variations.
    #[error("Flag '{flag}' has no variations.")]
    NoVariations {
        /// Key of the rejected flag.
        flag: String,
    },
    /// A variation's weight is outside of the `[0, 100]` range.
    #[error("Variation #{variation} of flag '{flag}' has an invalid weight ({weight}), it must be between 0 and 100.")]
    InvalidWeight {
        /// Key of the rejected flag.
        flag: String,
        /// Index of the variation.
        variation: usize,
        /// The rejected weight.
        weight: i64,
    },
    /// The variation weights add up to more than 100.
    #[error("The variation weights of flag '{flag}' add up to {sum}, which is more than 100.")]
    WeightSumExceeded {
        /// Key of the rejected flag.
        flag: String,
        /// Sum of the weights.
        sum: i64,
    },
    /// A target rule has no attribute name.
    #[error("Target rule #{rule} of variation #{variation} of flag '{flag}' has no attribute name.")]
    EmptyAttribute {
        /// Key of the rejected flag.
        flag: String,
        /// Index of the variation.
        variation: usize,
        /// Index of the rule within the variation.
        rule: usize,
    },
    /// A target rule has no comparison values.
    #[error("Target rule #{rule} of variation #{variation} of flag '{flag}' has no values.")]
    EmptyValues {
        /// Key of the rejected flag.
        flag: String,
        /// Index of the variation.
        variation: usize,
        /// Index of the rule within the variation.
        rule: usize,
    },
    /// A variation value doesn't have the requested type.
    #[error("Variation #{variation} of flag '{flag}' has a(n) {actual} value ('{value}'), but {expected} was requested.")]
    TypeMismatch {
        /// Key of the rejected flag.
        flag: String,
        /// Index of the variation.
        variation: usize,
        /// The variation value in textual form.
        value: String,
        /// Name of the variation value's type.
        actual: &'static str,
        /// Name of the requested type.
        expected: &'static str,
    },
    /// The flag definition could not be deserialized.
    #[error("Flag definition parsing failed. ({0})")]
    Parse(String),
}

impl ConfigError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::EmptyKey | ConfigError::NoVariations { .. } => ErrorKind::InvalidFlag,
            ConfigError::InvalidWeight { .. } => ErrorKind::InvalidVariation,
            ConfigError::WeightSumExceeded { .. } => ErrorKind::WeightSumExceeded,
            ConfigError::EmptyAttribute { .. } | ConfigError::EmptyValues { .. } => {
                ErrorKind::InvalidTargetRule
            }
            ConfigError::TypeMismatch { .. } => ErrorKind::ValueTypeMismatch,
            ConfigError::Parse(_) => ErrorKind::DefinitionParseFailure,
        }
    }
}
