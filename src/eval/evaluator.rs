use crate::errors::ErrorKind;
use crate::eval::bucketing;
use crate::eval::details::EvaluationDetails;
use crate::eval::details::EvaluationReason::{self, *};
use crate::eval::log_builder::EvalLogBuilder;
use crate::eval::matcher::matches;
use crate::{FeatureFlag, User, Variation};
use log::{info, log_enabled, warn};

macro_rules! eval_log_enabled {
    () => {
        log_enabled!(log::Level::Info)
    };
}

/// Evaluates a feature flag for the given user.
///
/// Returns [`None`] when the flag is turned off. Otherwise the variations are checked in order
/// and the value of the first one with a target rule matching the user is returned. When no
/// rule matches, the user is placed into one of the variations by percentage rollout.
///
/// # Examples
///
/// ```rust
/// use flageval::{evaluate, FeatureFlag, TargetRule, User, Variation};
///
/// let flag = FeatureFlag::builder("sample.flag")
///     .on(true)
///     .salt("feefifofum")
///     .variation(Variation::new(true, 0).target(TargetRule::new("key", vec!["u1".into()])))
///     .variation(Variation::new(false, 100))
///     .build()
///     .unwrap();
///
/// assert_eq!(evaluate(&flag, &User::new("u1")), Some(true));
/// assert_eq!(evaluate(&flag, &User::new("u2")), Some(false));
/// ```
pub fn evaluate<T: Clone>(flag: &FeatureFlag<T>, user: &User) -> Option<T> {
    evaluate_details(flag, user).value
}

/// The same as [`evaluate`] but returns an [`EvaluationDetails`] that contains additional
/// information about the result of the evaluation process.
pub fn evaluate_details<T: Clone>(flag: &FeatureFlag<T>, user: &User) -> EvaluationDetails<T> {
    let mut log = EvalLogBuilder::default();
    if eval_log_enabled!() {
        log.append(format!("Evaluating '{}' for User '{user}'", flag.key()).as_str())
            .inc_indent();
    }

    let reason = eval(flag, user, &mut log);

    if eval_log_enabled!() {
        log.new_ln(Some(format!("Returning {reason}.").as_str()));
        info!(event_id = 5000; "{}", log.content());
    }

    let mut details = EvaluationDetails::empty(flag.key(), reason);
    let variation = match reason.variation_index() {
        Some(index) => &flag.variations()[index],
        None => return details,
    };
    details.value = Some(variation.value().clone());
    if let TargetMatch { rule_index, .. } = reason {
        details.matched_target_rule = Some(variation.target_rules()[rule_index].clone());
    }
    details
}

fn eval<T>(flag: &FeatureFlag<T>, user: &User, log: &mut EvalLogBuilder) -> EvaluationReason {
    if !flag.is_on() {
        if eval_log_enabled!() {
            log.new_ln(Some("The flag is off, skipping target rules and percentage rollout."));
        }
        return Off;
    }
    if user.key().is_empty() {
        warn!(event_id = ErrorKind::UserKeyMissing.as_u16(); "Cannot evaluate flag '{}' for a user without a key. Returning no value.", flag.key());
        return MissingUserKey;
    }

    if let Some((variation_index, rule_index)) = eval_targets(flag.variations(), user, log) {
        return TargetMatch {
            variation_index,
            rule_index,
        };
    }

    let bucketing_key = user.bucketing_key();
    let bucket = bucketing::bucket(flag.key(), flag.salt(), &bucketing_key);
    let variation_index = bucketing::select(bucket, flag.variations());
    if eval_log_enabled!() {
        log.new_ln(Some(
            format!(
                "Evaluating % rollout based on the bucketing key '{bucketing_key}' => bucket {bucket:.4}"
            )
            .as_str(),
        ));
        let covered: i64 = flag.variations().iter().map(Variation::weight).sum();
        if bucket >= covered as f64 {
            log.append(
                format!(", beyond the {covered}% covered by the weights, using the last variation")
                    .as_str(),
            );
        }
    }
    Rollout {
        variation_index,
        bucket,
    }
}

fn eval_targets<T>(
    variations: &[Variation<T>],
    user: &User,
    log: &mut EvalLogBuilder,
) -> Option<(usize, usize)> {
    let has_rules = variations.iter().any(|v| !v.target_rules().is_empty());
    if eval_log_enabled!() && has_rules {
        log.new_ln(Some("Evaluating target rules:")).inc_indent();
    }
    let mut result = None;
    'variations: for (variation_index, variation) in variations.iter().enumerate() {
        if eval_log_enabled!() && !variation.target_rules().is_empty() {
            log.new_ln(Some(format!("Variation #{variation_index}:").as_str()))
                .inc_indent();
        }
        for (rule_index, rule) in variation.target_rules().iter().enumerate() {
            let matched = matches(rule, user);
            if eval_log_enabled!() {
                log.append_rule_result(rule, matched);
            }
            if matched {
                result = Some((variation_index, rule_index));
                if eval_log_enabled!() {
                    log.dec_indent();
                }
                break 'variations;
            }
        }
        if eval_log_enabled!() && !variation.target_rules().is_empty() {
            log.dec_indent();
        }
    }
    if eval_log_enabled!() && has_rules {
        log.dec_indent();
    }
    result
}

#[cfg(test)]
mod evaluator_tests {
    use crate::eval::details::EvaluationReason;
    use crate::{evaluate, evaluate_details, FeatureFlag, TargetRule, User, Variation};

    fn key_rule(key: &str) -> TargetRule {
        TargetRule::new("key", vec![key.into()])
    }

    fn flag(on: bool) -> FeatureFlag<&'static str> {
        FeatureFlag::builder("sample.flag")
            .on(on)
            .salt("feefifofum")
            .variation(Variation::new("a", 40).target(key_rule("x")))
            .variation(
                Variation::new("b", 60)
                    .target(TargetRule::new("groups", vec!["oracle".into()]))
                    .target(key_rule("x")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn off_returns_none() {
        let details = evaluate_details(&flag(false), &User::new("x"));

        assert_eq!(details.value, None);
        assert_eq!(details.reason, EvaluationReason::Off);
        assert_eq!(details.key, "sample.flag");
    }

    #[test]
    fn first_matching_variation_wins() {
        let details = evaluate_details(&flag(true), &User::new("x"));

        assert_eq!(details.value, Some("a"));
        assert_eq!(
            details.reason,
            EvaluationReason::TargetMatch {
                variation_index: 0,
                rule_index: 0
            }
        );
        assert_eq!(details.matched_target_rule, Some(key_rule("x")));
    }

    #[test]
    fn rule_index_within_variation() {
        let details = evaluate_details(&flag(true), &User::new("y").custom("groups", "oracle"));

        assert_eq!(details.value, Some("b"));
        assert_eq!(
            details.reason,
            EvaluationReason::TargetMatch {
                variation_index: 1,
                rule_index: 0
            }
        );
    }

    #[test]
    fn rollout_when_nothing_matches() {
        // u1 lands in bucket ~45.09, u3 in ~27.62
        let details = evaluate_details(&flag(true), &User::new("u1"));
        assert_eq!(details.value, Some("b"));
        assert!(matches!(
            details.reason,
            EvaluationReason::Rollout {
                variation_index: 1,
                ..
            }
        ));
        assert_eq!(details.matched_target_rule, None);

        assert_eq!(evaluate(&flag(true), &User::new("u3")), Some("a"));
    }

    #[test]
    fn secondary_key_changes_bucket() {
        // u1.s lands in bucket ~24.73
        assert_eq!(evaluate(&flag(true), &User::new("u1").secondary("s")), Some("a"));
    }

    #[test]
    fn empty_user_key() {
        let details = evaluate_details(&flag(true), &User::new(""));

        assert_eq!(details.value, None);
        assert_eq!(details.reason, EvaluationReason::MissingUserKey);
    }
}
