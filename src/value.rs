use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Represents a scalar value: a target rule's comparison value, an element of a list
/// user attribute, or the value of a dynamically typed feature flag.
///
/// # Examples
///
/// ```rust
/// use flageval::Value;
///
/// let bool_val = Value::Bool(true);
/// let int_val = Value::Int(42);
/// ```
#[derive(PartialEq, Debug, Clone, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A whole number value.
    Int(i64),
    /// A decimal number value.
    Float(f64),
    /// A text value.
    String(String),
}

impl Value {
    /// Reads the value as `bool`. Returns [`None`] if it's not a [`Value::Bool`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flageval::Value;
    ///
    /// let value = Value::Bool(true);
    /// assert!(value.as_bool().unwrap());
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `i64`. Returns [`None`] if it's not a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `f64`. Returns [`None`] if it's not a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as [`String`]. Returns [`None`] if it's not a [`Value::String`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flageval::Value;
    ///
    /// let value = Value::String("foo".to_owned());
    /// assert_eq!(value.as_str().unwrap(), "foo".to_owned());
    /// ```
    pub fn as_str(&self) -> Option<String> {
        if let Value::String(val) = self {
            return Some(val.clone());
        }
        None
    }

    /// Compares two scalars the way target rules do.
    ///
    /// Values of the same kind are equal when their contents are equal. An [`Value::Int`]
    /// and a [`Value::Float`] are equal when they represent the same number. Any other
    /// combination (e.g. `1` and `true`, or `"1"` and `1`) is never equal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flageval::Value;
    ///
    /// assert!(Value::Int(1000).scalar_eq(&Value::Float(1000.0)));
    /// assert!(!Value::Int(1).scalar_eq(&Value::Bool(true)));
    /// ```
    pub fn scalar_eq(&self, other: &Value) -> bool {
        match other {
            Value::Bool(val) => self.eq_bool(*val),
            Value::Int(val) => self.eq_int(*val),
            Value::Float(val) => self.eq_float(*val),
            Value::String(val) => self.eq_str(val),
        }
    }

    pub(crate) fn eq_bool(&self, other: bool) -> bool {
        matches!(self, Value::Bool(val) if *val == other)
    }

    pub(crate) fn eq_str(&self, other: &str) -> bool {
        matches!(self, Value::String(val) if val == other)
    }

    pub(crate) fn eq_int(&self, other: i64) -> bool {
        match self {
            Value::Int(val) => *val == other,
            Value::Float(val) => int_eq_float(other, *val),
            _ => false,
        }
    }

    pub(crate) fn eq_float(&self, other: f64) -> bool {
        match self {
            Value::Int(val) => int_eq_float(*val, other),
            Value::Float(val) => *val == other,
            _ => false,
        }
    }

    /// Creates a [`Value`] from a [`serde_json::Value`]. Returns [`None`] if the conversion is not possible.
    ///
    /// JSON numbers without a fraction or exponent become [`Value::Int`], other numbers become [`Value::Float`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flageval::Value;
    ///
    /// let json_str = serde_json::Value::String("foo".to_owned());
    /// assert_eq!(Value::String("foo".to_owned()), Value::from_json_val(&json_str).unwrap())
    /// ```
    pub fn from_json_val(json_val: &serde_json::Value) -> Option<Value> {
        match json_val {
            serde_json::Value::Bool(val) => Some(Value::Bool(*val)),
            serde_json::Value::String(val) => Some(Value::String(val.clone())),
            serde_json::Value::Number(val) => {
                if let Some(int_val) = val.as_i64() {
                    return Some(Value::Int(int_val));
                }
                if let Some(float_val) = val.as_f64() {
                    return Some(Value::Float(float_val));
                }
                None
            }
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "i64",
            Value::Float(_) => "f64",
            Value::String(_) => "String",
        }
    }
}

// The float must hold an exact integral value, `i64::MAX as f64` is already out of range.
fn int_eq_float(int_val: i64, float_val: f64) -> bool {
    float_val.fract() == 0.0
        && float_val >= i64::MIN as f64
        && float_val < i64::MAX as f64
        && float_val as i64 == int_val
}

impl TryFrom<serde_json::Value> for Value {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json_val(&value).ok_or_else(|| format!("'{value}' is not a scalar value"))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(val) => serializer.serialize_bool(*val),
            Value::Int(val) => serializer.serialize_i64(*val),
            Value::Float(val) => serializer.serialize_f64(*val),
            Value::String(val) => serializer.serialize_str(val),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(val) => write!(f, "{val}"),
            Value::Int(val) => write!(f, "{val}"),
            Value::Float(val) => write!(f, "{val}"),
            Value::String(val) => f.write_str(val),
        }
    }
}

/// Represents a primitive type that can be the value of a typed feature flag.
pub trait ValuePrimitive: Into<Value> + Clone {
    /// Reads the primitive value from a [`Value`].
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! primitive_impl {
    ($ob:ident $to:ident $as_m:ident $t:ty) => (
        from_val_to_enum!($ob $to $t);

        impl ValuePrimitive for $t {
            fn from_value(value: &Value) -> Option<Self> {
                value.$as_m()
            }
        }
    )
}

primitive_impl!(Value String as_str String);
primitive_impl!(Value Float as_float f64);
primitive_impl!(Value Int as_int i64);
primitive_impl!(Value Bool as_bool bool);
from_val_to_enum_into!(Value Int i8 i16 i32 u8 u16 u32);
from_val_to_enum_into!(Value Float f32);
from_val_to_enum_into!(Value String &str);

impl ValuePrimitive for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
