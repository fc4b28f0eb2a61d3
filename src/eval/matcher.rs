use crate::{TargetRule, User};

/// Reports whether the target rule matches the given user.
///
/// The rule's attribute is resolved on the user (`"key"` resolves to the user key). A missing
/// attribute never matches. A scalar attribute matches when it's equal to any of the rule's
/// values, a list attribute matches when any of its items is equal to any of the rule's values.
/// Values of different kinds are never equal, except integers and decimals representing the
/// same number.
///
/// # Examples
///
/// ```rust
/// use flageval::{matches, TargetRule, User, Value};
///
/// let rule = TargetRule::new("groups", vec!["google".into(), "microsoft".into()]);
///
/// assert!(matches(&rule, &User::new("u1").custom("groups", vec!["oracle", "microsoft"])));
/// assert!(!matches(&rule, &User::new("u2").custom("groups", "oracle")));
/// assert!(!matches(&rule, &User::new("u3")));
/// ```
pub fn matches(rule: &TargetRule, user: &User) -> bool {
    match user.get(rule.attribute()) {
        Some(user_val) => user_val.matches_any(rule.values()),
        None => false,
    }
}

#[cfg(test)]
mod matcher_tests {
    use crate::eval::matcher::matches;
    use crate::{TargetRule, User, UserValue, Value};

    #[test]
    fn key_targeting() {
        let rule = TargetRule::new("key", vec!["u1".into()]);

        assert!(matches(&rule, &User::new("u1")));
        assert!(!matches(&rule, &User::new("u2")));
        assert!(!matches(&rule, &User::new("U1")));
    }

    #[test]
    fn built_in_attribute() {
        let rule = TargetRule::new("email", vec!["a@example.com".into()]);

        assert!(matches(&rule, &User::new("u1").email("a@example.com")));
        assert!(!matches(&rule, &User::new("u1")));

        let anonymous = TargetRule::new("anonymous", vec![true.into()]);
        assert!(matches(&anonymous, &User::new("u1").anonymous(true)));
        assert!(!matches(&anonymous, &User::new("u1").anonymous(false)));
    }

    #[test]
    fn list_attribute() {
        let rule = TargetRule::new("groups", vec!["google".into(), "microsoft".into()]);

        assert!(matches(
            &rule,
            &User::new("u1").custom("groups", vec!["apple", "microsoft"])
        ));
        assert!(!matches(&rule, &User::new("u1").custom("groups", vec!["oracle"])));
        assert!(!matches(&rule, &User::new("u1").custom("groups", Vec::<Value>::new())));
        assert!(matches(&rule, &User::new("u1").custom("groups", "google")));
        assert!(!matches(&rule, &User::new("u1").custom("groups", "oracle")));
    }

    #[test]
    fn cross_type_never_matches() {
        let rule = TargetRule::new("isMember", vec![true.into()]);

        assert!(matches(&rule, &User::new("u1").custom("isMember", true)));
        assert!(!matches(&rule, &User::new("u1").custom("isMember", 1)));
        assert!(!matches(&rule, &User::new("u1").custom("isMember", "true")));
        assert!(!matches(
            &rule,
            &User::new("u1").custom("isMember", UserValue::List(vec![Value::Int(1)]))
        ));
    }

    #[test]
    fn numeric_equivalence() {
        let int_rule = TargetRule::new("customerRank", vec![Value::Int(1000)]);
        let float_rule = TargetRule::new("customerRank", vec![Value::Float(1000.0)]);

        for rule in [&int_rule, &float_rule] {
            assert!(matches(rule, &User::new("u1").custom("customerRank", 1000)));
            assert!(matches(rule, &User::new("u1").custom("customerRank", 1000.0)));
            assert!(matches(rule, &User::new("u1").custom("customerRank", vec![5_i64, 1000])));
            assert!(!matches(rule, &User::new("u1").custom("customerRank", 1000.5)));
            assert!(!matches(rule, &User::new("u1").custom("customerRank", "1000")));
        }
    }

    #[test]
    fn mixed_rule_values() {
        let rule = TargetRule::new(
            "customerRank",
            vec![Value::Int(1000), Value::Bool(true), Value::Float(32.4)],
        );

        assert!(matches(&rule, &User::new("u1").custom("customerRank", 32.4)));
        assert!(matches(&rule, &User::new("u1").custom("customerRank", true)));
        assert!(!matches(&rule, &User::new("u1").custom("customerRank", false)));
        assert!(!matches(&rule, &User::new("u1").custom("customerRank", 1)));
    }

    #[test]
    fn missing_attribute() {
        let rule = TargetRule::new("groups", vec!["google".into()]);

        assert!(!matches(&rule, &User::new("u1")));
        assert!(!matches(&rule, &User::new("u1").custom("group", "google")));
    }
}
