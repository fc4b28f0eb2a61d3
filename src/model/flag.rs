use crate::constants::MAX_WEIGHT;
use crate::errors::ConfigError;
use crate::eval::details::EvaluationDetails;
use crate::eval::evaluator;
use crate::value::{Value, ValuePrimitive};
use crate::User;
use log::error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::cmp::min;
use std::fmt::{Display, Formatter};

const STRING_LIST_MAX_LENGTH: usize = 10;

/// Describes a target rule: the user matches when the value of the given attribute is one of
/// the listed values.
///
/// # Examples
///
/// ```rust
/// use flageval::{TargetRule, Value};
///
/// let rule = TargetRule::new("groups", vec!["google".into(), "microsoft".into()]);
/// let mixed = TargetRule::new("customerRank", vec![Value::Int(1000), Value::Bool(true), Value::Float(32.4)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRule {
    attribute: String,
    values: Vec<Value>,
}

impl TargetRule {
    /// Creates a new [`TargetRule`] on the given user attribute. The attribute can be `"key"`,
    /// one of the built-in user attributes, or a custom attribute.
    pub fn new(attribute: &str, values: Vec<Value>) -> Self {
        Self {
            attribute: attribute.to_owned(),
            values,
        }
    }

    /// The user attribute the rule is based on.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The values the user attribute is compared to.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Display for TargetRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "User.{} IS ONE OF ", self.attribute)?;
        let len = self.values.len();
        let limit = min(len, STRING_LIST_MAX_LENGTH);
        let mut arr_txt = self.values[..limit]
            .iter()
            .map(|item| match item {
                Value::String(text) => format!("'{text}'"),
                other => format!("{other}"),
            })
            .collect::<Vec<String>>()
            .join(", ");
        if len > STRING_LIST_MAX_LENGTH {
            let rest = len - STRING_LIST_MAX_LENGTH;
            let val_t = if rest > 1 { "values" } else { "value" };
            arr_txt.push_str(format!(", ... <{rest} more {val_t}>").as_str());
        }
        write!(f, "[{arr_txt}]")
    }
}

/// Describes one possible value of a feature flag along with its target rules and rollout weight.
///
/// # Examples
///
/// ```rust
/// use flageval::{TargetRule, Variation};
///
/// let variation = Variation::new(true, 50)
///     .target(TargetRule::new("key", vec!["targetOn@test.com".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation<T> {
    value: T,
    weight: i64,
    #[serde(rename = "targets", default)]
    target_rules: Vec<TargetRule>,
}

impl<T> Variation<T> {
    /// Creates a new [`Variation`] with the given value and percentage rollout weight.
    pub fn new(value: T, weight: i64) -> Self {
        Self {
            value,
            weight,
            target_rules: Vec::new(),
        }
    }

    /// Appends a target rule to the variation.
    pub fn target(mut self, rule: TargetRule) -> Self {
        self.target_rules.push(rule);
        self
    }

    /// The value served when the variation is selected.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The percentage of users placed into this variation when no target rule matches.
    pub fn weight(&self) -> i64 {
        self.weight
    }

    /// The target rules of the variation, in evaluation order.
    pub fn target_rules(&self) -> &[TargetRule] {
        &self.target_rules
    }
}

/// Describes a feature flag. A [`FeatureFlag`] is always well-formed: it can only be obtained
/// through [`FlagBuilder::build`], [`FeatureFlag::from_json`], or deserialization, each of
/// which validates the definition.
///
/// # Examples
///
/// ```rust
/// use flageval::{FeatureFlag, TargetRule, User, Variation};
///
/// let flag = FeatureFlag::builder("sample.flag")
///     .on(true)
///     .salt("feefifofum")
///     .variation(Variation::new(true, 30).target(TargetRule::new("key", vec!["u1".into()])))
///     .variation(Variation::new(false, 70))
///     .build()
///     .unwrap();
///
/// assert_eq!(flag.evaluate(&User::new("u1")), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "FlagBuilder<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct FeatureFlag<T> {
    key: String,
    name: String,
    on: bool,
    salt: String,
    variations: Vec<Variation<T>>,
}

impl<T> FeatureFlag<T> {
    /// Creates a new [`FlagBuilder`] used to build a [`FeatureFlag`].
    pub fn builder(key: &str) -> FlagBuilder<T> {
        FlagBuilder::new(key)
    }

    /// The unique key of the flag.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The human readable name of the flag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Indicates whether the flag is turned on. A turned off flag has no value for any user.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// The salt mixed into the percentage rollout hash.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The variations of the flag, in evaluation order.
    pub fn variations(&self) -> &[Variation<T>] {
        &self.variations
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.variations.is_empty() {
            return Err(ConfigError::NoVariations {
                flag: self.key.clone(),
            });
        }
        let mut sum = 0;
        for (index, variation) in self.variations.iter().enumerate() {
            if !(0..=MAX_WEIGHT).contains(&variation.weight) {
                return Err(ConfigError::InvalidWeight {
                    flag: self.key.clone(),
                    variation: index,
                    weight: variation.weight,
                });
            }
            sum += variation.weight;
            for (rule_index, rule) in variation.target_rules.iter().enumerate() {
                if rule.attribute.is_empty() {
                    return Err(ConfigError::EmptyAttribute {
                        flag: self.key.clone(),
                        variation: index,
                        rule: rule_index,
                    });
                }
                if rule.values.is_empty() {
                    return Err(ConfigError::EmptyValues {
                        flag: self.key.clone(),
                        variation: index,
                        rule: rule_index,
                    });
                }
            }
        }
        if sum > MAX_WEIGHT {
            return Err(ConfigError::WeightSumExceeded {
                flag: self.key.clone(),
                sum,
            });
        }
        Ok(())
    }
}

impl<T: Clone> FeatureFlag<T> {
    /// Evaluates the flag for the given user.
    ///
    /// Returns [`None`] when the flag is turned off, otherwise the value of the first variation
    /// with a matching target rule, or the value of the variation the user is bucketed into.
    pub fn evaluate(&self, user: &User) -> Option<T> {
        evaluator::evaluate(self, user)
    }

    /// The same as [`FeatureFlag::evaluate`] but returns an [`EvaluationDetails`] that
    /// describes why the value was selected.
    pub fn evaluate_details(&self, user: &User) -> EvaluationDetails<T> {
        evaluator::evaluate_details(self, user)
    }
}

impl<T: DeserializeOwned> FeatureFlag<T> {
    /// Parses and validates a flag definition from JSON.
    ///
    /// # Errors
    ///
    /// This method fails when the JSON is not a flag definition, or when the definition is invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flageval::FeatureFlag;
    ///
    /// let flag = FeatureFlag::<bool>::from_json(r#"{
    ///     "key": "sample.flag",
    ///     "on": true,
    ///     "salt": "feefifofum",
    ///     "variations": [
    ///         {"value": true, "weight": 50, "targets": [{"attribute": "key", "values": ["u1"]}]},
    ///         {"value": false, "weight": 50}
    ///     ]
    /// }"#).unwrap();
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<FlagBuilder<T>>(json) {
            Ok(builder) => builder.build(),
            Err(err) => {
                let err = ConfigError::Parse(err.to_string());
                error!(event_id = err.kind().as_u16(); "{err}");
                Err(err)
            }
        }
    }
}

impl FeatureFlag<Value> {
    /// Converts a dynamically typed flag into a flag with `T` typed values.
    ///
    /// # Errors
    ///
    /// This method fails when any of the variation values is not a `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flageval::{FeatureFlag, Value, Variation};
    ///
    /// let flag = FeatureFlag::builder("rank")
    ///     .variation(Variation::new(Value::Int(1), 100))
    ///     .build()
    ///     .unwrap();
    ///
    /// let typed = flag.typed::<i64>().unwrap();
    /// assert_eq!(*typed.variations()[0].value(), 1);
    /// ```
    pub fn typed<T: ValuePrimitive>(&self) -> Result<FeatureFlag<T>, ConfigError> {
        let mut variations = Vec::with_capacity(self.variations.len());
        for (index, variation) in self.variations.iter().enumerate() {
            let value = match T::from_value(&variation.value) {
                Some(value) => value,
                None => {
                    let err = ConfigError::TypeMismatch {
                        flag: self.key.clone(),
                        variation: index,
                        value: variation.value.to_string(),
                        actual: variation.value.type_name(),
                        expected: type_name::<T>(),
                    };
                    error!(event_id = err.kind().as_u16(); "{err}");
                    return Err(err);
                }
            };
            variations.push(Variation {
                value,
                weight: variation.weight,
                target_rules: variation.target_rules.clone(),
            });
        }
        Ok(FeatureFlag {
            key: self.key.clone(),
            name: self.name.clone(),
            on: self.on,
            salt: self.salt.clone(),
            variations,
        })
    }
}

impl<T> TryFrom<FlagBuilder<T>> for FeatureFlag<T> {
    type Error = ConfigError;

    fn try_from(builder: FlagBuilder<T>) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// Builder to create a validated [`FeatureFlag`].
///
/// The flag is turned off and has an empty name and salt unless specified otherwise.
///
/// # Examples
///
/// ```rust
/// use flageval::{FeatureFlag, Variation};
///
/// let builder = FeatureFlag::builder("sample.flag")
///     .name("Sample flag")
///     .on(true)
///     .salt("feefifofum")
///     .variation(Variation::new("blue".to_owned(), 50))
///     .variation(Variation::new("green".to_owned(), 50));
///
/// let flag = builder.build().unwrap();
/// ```
#[derive(Debug, Deserialize)]
pub struct FlagBuilder<T> {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    on: bool,
    #[serde(default)]
    salt: String,
    #[serde(default = "Vec::new")]
    variations: Vec<Variation<T>>,
}

impl<T> FlagBuilder<T> {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_owned(),
            name: String::default(),
            on: false,
            salt: String::default(),
            variations: Vec::new(),
        }
    }

    /// Sets the human readable name of the flag.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    /// Turns the flag on or off.
    pub fn on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    /// Sets the salt mixed into the percentage rollout hash.
    pub fn salt(mut self, salt: &str) -> Self {
        self.salt = salt.to_owned();
        self
    }

    /// Appends a variation to the flag.
    pub fn variation(mut self, variation: Variation<T>) -> Self {
        self.variations.push(variation);
        self
    }

    /// Validates the definition and creates the [`FeatureFlag`].
    ///
    /// # Errors
    ///
    /// This method fails in the following cases:
    /// - The flag key is empty.
    /// - The flag has no variations.
    /// - A variation weight is not between 0 and 100, or the weights add up to more than 100.
    /// - A target rule has no attribute name or no values.
    pub fn build(self) -> Result<FeatureFlag<T>, ConfigError> {
        let flag = FeatureFlag {
            key: self.key,
            name: self.name,
            on: self.on,
            salt: self.salt,
            variations: self.variations,
        };
        match flag.validate() {
            Ok(()) => Ok(flag),
            Err(err) => {
                error!(event_id = err.kind().as_u16(); "{err}");
                Err(err)
            }
        }
    }
}
