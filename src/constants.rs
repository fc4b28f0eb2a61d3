/// Version of the flageval crate.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of leading hex digits of the SHA-1 digest used as the rollout hash.
pub const HASH_HEX_DIGITS: usize = 15;
/// The largest value representable with [`HASH_HEX_DIGITS`] hex digits.
pub const HASH_SCALE: f64 = 0xFFF_FFFF_FFFF_FFFF_u64 as f64;

/// Upper bound of a single variation weight and of the sum of all weights.
pub const MAX_WEIGHT: i64 = 100;
