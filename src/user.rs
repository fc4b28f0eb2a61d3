use crate::value::Value;
use log::warn;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Supported user attribute value types.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum UserValue {
    /// String user attribute value.
    String(String),
    /// Boolean user attribute value.
    Bool(bool),
    /// Signed integer user attribute value.
    Int(i64),
    /// Float user attribute value.
    Float(f64),
    /// List user attribute value, a target rule matches it when any of its items matches.
    List(Vec<Value>),
}

impl UserValue {
    /// Reports whether this attribute value intersects with `values`.
    ///
    /// A scalar matches when it's equal to any of `values`, a list matches when any of its items
    /// is equal to any of `values`. Equality follows [`Value::scalar_eq`].
    pub(crate) fn matches_any(&self, values: &[Value]) -> bool {
        match self {
            UserValue::String(val) => values.iter().any(|v| v.eq_str(val)),
            UserValue::Bool(val) => values.iter().any(|v| v.eq_bool(*val)),
            UserValue::Int(val) => values.iter().any(|v| v.eq_int(*val)),
            UserValue::Float(val) => values.iter().any(|v| v.eq_float(*val)),
            UserValue::List(items) => items
                .iter()
                .any(|item| values.iter().any(|v| v.scalar_eq(item))),
        }
    }
}

impl Display for UserValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UserValue::String(val) => f.write_str(val),
            UserValue::Bool(val) => write!(f, "{val}"),
            UserValue::Int(val) => write!(f, "{val}"),
            UserValue::Float(val) => write!(f, "{val}"),
            UserValue::List(val) => {
                let items = val
                    .iter()
                    .map(|item| format!("'{item}'"))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{items}]")
            }
        }
    }
}

impl Serialize for UserValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            UserValue::String(val) => serializer.serialize_str(val),
            UserValue::Bool(val) => serializer.serialize_bool(*val),
            UserValue::Int(val) => serializer.serialize_i64(*val),
            UserValue::Float(val) => serializer.serialize_f64(*val),
            UserValue::List(val) => val.serialize(serializer),
        }
    }
}

impl TryFrom<serde_json::Value> for UserValue {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        if let serde_json::Value::Array(items) = &value {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match Value::from_json_val(item) {
                    Some(val) => list.push(val),
                    None => return Err(format!("'{item}' is not a valid list item")),
                }
            }
            return Ok(UserValue::List(list));
        }
        match Value::from_json_val(&value) {
            Some(val) => Ok(val.into()),
            None => Err(format!("'{value}' is not a valid user attribute value")),
        }
    }
}

impl From<Value> for UserValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(val) => UserValue::Bool(val),
            Value::Int(val) => UserValue::Int(val),
            Value::Float(val) => UserValue::Float(val),
            Value::String(val) => UserValue::String(val),
        }
    }
}

from_val_to_enum!(UserValue String String);
from_val_to_enum!(UserValue Bool bool);
from_val_to_enum!(UserValue List Vec<Value>);
from_val_to_enum_into!(UserValue Float f64 f32);
from_val_to_enum_into!(UserValue Int i8 i16 i32 i64 u8 u16 u32);
from_val_to_enum_into!(UserValue String &str);
from_vec_to_list!(UserValue List &str String bool i64 f64);

/// Describes a user. Contains the key and the attributes used for evaluating target rules
/// and percentage rollouts.
///
/// Target rules compare attribute values by kind: a [`UserValue::String`] only matches
/// text comparison values, a [`UserValue::Bool`] only matches boolean comparison values,
/// and numbers match numeric comparison values regardless of whether they were written as
/// integers or decimals. List attributes match when any of their items matches.
///
/// # Examples:
///
/// ```rust
/// use flageval::User;
///
/// let user = User::new("user-key")
///     .email("john@example.com")
///     .custom("groups", vec!["google", "microsoft"])
///     .custom("customerRank", 1000)
///     .custom("isMember", true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, UserValue>")]
pub struct User {
    #[serde(flatten)]
    attributes: HashMap<String, UserValue>,
}

impl User {
    /// The attribute name that refers to the user key.
    pub const KEY: &'static str = "key";
    /// The attribute name of the secondary key, appended to the key for percentage rollouts.
    pub const SECONDARY: &'static str = "secondary";
    /// The attribute name of the user's IP address.
    pub const IP: &'static str = "ip";
    /// The attribute name of the user's country.
    pub const COUNTRY: &'static str = "country";
    /// The attribute name of the user's email address.
    pub const EMAIL: &'static str = "email";
    /// The attribute name of the user's full name.
    pub const NAME: &'static str = "name";
    /// The attribute name of the user's avatar URL.
    pub const AVATAR: &'static str = "avatar";
    /// The attribute name of the user's first name.
    pub const FIRST_NAME: &'static str = "firstName";
    /// The attribute name of the user's last name.
    pub const LAST_NAME: &'static str = "lastName";
    /// The attribute name of the user's anonymity flag.
    pub const ANONYMOUS: &'static str = "anonymous";

    const RESERVED: [&'static str; 10] = [
        Self::KEY,
        Self::SECONDARY,
        Self::IP,
        Self::COUNTRY,
        Self::EMAIL,
        Self::NAME,
        Self::AVATAR,
        Self::FIRST_NAME,
        Self::LAST_NAME,
        Self::ANONYMOUS,
    ];

    /// Initializes a new [`User`].
    ///
    /// The key must not be empty: evaluating any flag that is turned on for a user with an empty
    /// key gives no value.
    ///
    /// # Examples:
    ///
    /// ```rust
    /// use flageval::User;
    ///
    /// let user = User::new("user-key");
    /// assert_eq!(user.key(), "user-key");
    /// ```
    pub fn new(key: &str) -> Self {
        Self {
            attributes: HashMap::from([(Self::KEY.to_owned(), UserValue::from(key))]),
        }
    }

    /// Secondary key of the user. When set, it's appended to the key for percentage rollouts.
    pub fn secondary(self, secondary: &str) -> Self {
        self.built_in(Self::SECONDARY, secondary.into())
    }

    /// IP address of the user.
    pub fn ip(self, ip: &str) -> Self {
        self.built_in(Self::IP, ip.into())
    }

    /// Country of the user.
    pub fn country(self, country: &str) -> Self {
        self.built_in(Self::COUNTRY, country.into())
    }

    /// Email address of the user.
    ///
    /// # Examples:
    ///
    /// ```rust
    /// use flageval::User;
    ///
    /// let user = User::new("user-key")
    ///     .email("john@example.com");
    /// ```
    pub fn email(self, email: &str) -> Self {
        self.built_in(Self::EMAIL, email.into())
    }

    /// Full name of the user.
    pub fn name(self, name: &str) -> Self {
        self.built_in(Self::NAME, name.into())
    }

    /// Avatar URL of the user.
    pub fn avatar(self, avatar: &str) -> Self {
        self.built_in(Self::AVATAR, avatar.into())
    }

    /// First name of the user.
    pub fn first_name(self, first_name: &str) -> Self {
        self.built_in(Self::FIRST_NAME, first_name.into())
    }

    /// Last name of the user.
    pub fn last_name(self, last_name: &str) -> Self {
        self.built_in(Self::LAST_NAME, last_name.into())
    }

    /// Indicates whether the user is anonymous.
    pub fn anonymous(self, anonymous: bool) -> Self {
        self.built_in(Self::ANONYMOUS, anonymous.into())
    }

    /// Custom attribute of the user for target rule definitions (e.g. user groups, customer rank, etc.)
    ///
    /// Custom attributes can't shadow the built-in ones, setting one with a reserved name is ignored.
    ///
    /// # Examples:
    ///
    /// ```rust
    /// use flageval::User;
    ///
    /// let user = User::new("user-key")
    ///     .custom("groups", vec!["google", "microsoft"])
    ///     .custom("rating", 4.5);
    /// ```
    pub fn custom<T: Into<UserValue>>(mut self, key: &str, value: T) -> Self {
        if Self::RESERVED.contains(&key) {
            warn!(event_id = 3001; "The custom attribute '{key}' is ignored, '{key}' is a built-in user attribute.");
            return self;
        }
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// The key of the user.
    pub fn key(&self) -> &str {
        match self.attributes.get(Self::KEY) {
            Some(UserValue::String(key)) => key,
            _ => "",
        }
    }

    /// The key used to place the user into a percentage rollout bucket: the user key,
    /// followed by `.` and the secondary key when it's set.
    pub fn bucketing_key(&self) -> Cow<'_, str> {
        match self.attributes.get(Self::SECONDARY) {
            Some(UserValue::String(secondary)) => {
                Cow::Owned(format!("{}.{secondary}", self.key()))
            }
            _ => Cow::Borrowed(self.key()),
        }
    }

    /// Gets a built-in or custom attribute by name. `"key"` resolves to the user key.
    pub fn get(&self, attribute: &str) -> Option<&UserValue> {
        self.attributes.get(attribute)
    }

    fn built_in(mut self, key: &str, value: UserValue) -> Self {
        self.attributes.insert(key.to_owned(), value);
        self
    }
}

impl TryFrom<HashMap<String, UserValue>> for User {
    type Error = String;

    fn try_from(attributes: HashMap<String, UserValue>) -> Result<Self, Self::Error> {
        match attributes.get(Self::KEY) {
            Some(UserValue::String(key)) if key.is_empty() => {
                return Err("the user key must not be empty".to_owned())
            }
            Some(UserValue::String(_)) => {}
            Some(other) => return Err(format!("the user key must be a string, got '{other}'")),
            None => return Err("the user key is missing".to_owned()),
        }
        for name in Self::RESERVED.iter().filter(|n| **n != Self::KEY) {
            match (attributes.get(*name), *name == Self::ANONYMOUS) {
                (None, _) | (Some(UserValue::Bool(_)), true) | (Some(UserValue::String(_)), false) => {}
                (Some(other), true) => {
                    return Err(format!("the '{name}' attribute must be a boolean, got '{other}'"))
                }
                (Some(other), false) => {
                    return Err(format!("the '{name}' attribute must be a string, got '{other}'"))
                }
            }
        }
        Ok(Self { attributes })
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(str) => write!(f, "{str}"),
            Err(_) => f.write_str("<invalid user>"),
        }
    }
}

#[cfg(test)]
mod user_tests {
    use crate::{User, UserValue, Value};

    #[test]
    fn built_in_attributes() {
        let user = User::new("u1")
            .email("john@example.com")
            .country("Hungary")
            .anonymous(true);

        assert_eq!(user.key(), "u1");
        assert_eq!(user.get("email"), Some(&UserValue::from("john@example.com")));
        assert_eq!(user.get("country"), Some(&UserValue::from("Hungary")));
        assert_eq!(user.get("anonymous"), Some(&UserValue::Bool(true)));
        assert_eq!(user.get("key"), Some(&UserValue::from("u1")));
    }

    #[test]
    fn custom_cannot_shadow_built_in() {
        let user = User::new("u1").custom("key", "u2").custom("email", 5);

        assert_eq!(user.key(), "u1");
        assert!(user.get("email").is_none());
    }

    #[test]
    fn bucketing_key() {
        assert_eq!(User::new("u1").bucketing_key(), "u1");
        assert_eq!(User::new("u1").secondary("s").bucketing_key(), "u1.s");
    }

    #[test]
    fn list_matching() {
        let groups = UserValue::from(vec!["google", "microsoft"]);
        assert!(groups.matches_any(&["microsoft".into()]));
        assert!(!groups.matches_any(&["oracle".into()]));
        assert!(!UserValue::List(vec![]).matches_any(&["oracle".into()]));

        let ranks = UserValue::from(vec![Value::Int(1), Value::Float(2.5)]);
        assert!(ranks.matches_any(&[Value::Float(1.0)]));
        assert!(!ranks.matches_any(&[Value::Bool(true)]));
    }

    #[test]
    fn deserialize() {
        let user: User = serde_json::from_str(
            r#"{"key":"u1","groups":["google",1,2.5],"isMember":true,"customerRank":1000.0}"#,
        )
        .unwrap();

        assert_eq!(user.key(), "u1");
        assert_eq!(
            user.get("groups"),
            Some(&UserValue::List(vec![
                Value::String("google".to_owned()),
                Value::Int(1),
                Value::Float(2.5)
            ]))
        );
        assert_eq!(user.get("isMember"), Some(&UserValue::Bool(true)));
        assert_eq!(user.get("customerRank"), Some(&UserValue::Float(1000.0)));
    }

    #[test]
    fn deserialize_invalid() {
        assert!(serde_json::from_str::<User>(r#"{"groups":["google"]}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":1}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":"u1","groups":[["nested"]]}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":"u1","obj":{"a":1}}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":""}"#).is_err());
    }

    #[test]
    fn deserialize_built_in_types() {
        assert!(serde_json::from_str::<User>(r#"{"key":"u1","secondary":5}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":"u1","anonymous":"yes"}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":"u1","email":["a@example.com"]}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"key":"u1","firstName":true}"#).is_err());

        let user: User = serde_json::from_str(
            r#"{"key":"u1","secondary":"s","anonymous":false,"country":"Hungary"}"#,
        )
        .unwrap();
        assert_eq!(user.bucketing_key(), "u1.s");
        assert_eq!(user.get("anonymous"), Some(&UserValue::Bool(false)));
    }

    #[test]
    fn display() {
        let user = User::new("u1");
        assert_eq!(user.to_string(), r#"{"key":"u1"}"#);
    }
}
