use crate::constants::{HASH_HEX_DIGITS, HASH_SCALE};
use crate::{utils, Variation};

/// Computes the percentage rollout bucket of a user for a flag, a number between 0 and 100.
///
/// The bucket is derived from the SHA-1 hash of `"{user_key}.{flag_key}.{salt}"`: the leading
/// 15 hex digits of the digest are read as an integer and scaled by the largest 15-digit value.
/// The same inputs always give the same bucket, and different salts give independent buckets
/// for the same user.
///
/// # Examples
///
/// ```rust
/// use flageval::bucket;
///
/// let b = bucket("sample.flag", "feefifofum", "u1");
/// assert!((0.0..=100.0).contains(&b));
/// assert_eq!(b, bucket("sample.flag", "feefifofum", "u1"));
/// ```
pub fn bucket(flag_key: &str, salt: &str, user_key: &str) -> f64 {
    let hash = utils::sha1(format!("{user_key}.{flag_key}.{salt}").as_str());
    // A SHA-1 hex digest always has a valid 15-digit prefix.
    let value = u64::from_str_radix(&hash[..HASH_HEX_DIGITS], 16).unwrap_or_default();
    value as f64 / HASH_SCALE * 100.0
}

/// Selects the index of the variation a user falls into by percentage rollout.
///
/// The variation weights are accumulated in order and the first variation whose cumulative
/// weight is greater than the user's [`bucket`] is selected. When the bucket is beyond the
/// sum of all weights, the last variation is selected.
///
/// `variations` must not be empty, a validated [`crate::FeatureFlag`] always has at least one.
pub fn allocate<T>(flag_key: &str, salt: &str, user_key: &str, variations: &[Variation<T>]) -> usize {
    select(bucket(flag_key, salt, user_key), variations)
}

pub(crate) fn select<T>(bucket: f64, variations: &[Variation<T>]) -> usize {
    let mut cumulative: i64 = 0;
    for (index, variation) in variations.iter().enumerate() {
        // Unvalidated variations may carry negative or huge weights.
        cumulative = cumulative.saturating_add(variation.weight().max(0));
        if bucket < cumulative as f64 {
            return index;
        }
    }
    variations.len().saturating_sub(1)
}
