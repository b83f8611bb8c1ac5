//! Bloom-filter cache of tags that have passed full verification.

use ndntac::AuthTag;
use sha2::{Digest, Sha256};

use crate::{RouterConfig, RouterError};

/// Upper bound on the number of hash functions.
const MAX_HASH_COUNT: u32 = 64;

/// A probabilistic set of verified tags.
///
/// Membership is one-sided: a tag that was inserted always tests as
/// contained, and a tag that was never inserted tests as contained with
/// probability at most the configured rate while the cache holds no more
/// than its capacity. Past capacity the rate degrades; nothing fails.
/// There is no removal.
///
/// The filter has `m = ceil(-n ln p / (ln 2)^2)` bits and
/// `k = round(m / n * ln 2)` hash functions. Bit indices come from double
/// hashing over the SHA-256 digest of the tag's wire encoding.
///
/// # Examples
///
/// ```
/// use ndntac::AuthTag;
/// use ndntac_router::AuthCache;
///
/// let mut cache = AuthCache::new(1e-6, 100).unwrap();
/// let tag = AuthTag::with_access_level(2).with_signature_value(vec![1]);
///
/// assert!(!cache.contains(&tag));
/// cache.insert(&tag);
/// assert!(cache.contains(&tag));
/// ```
#[derive(Debug, Clone)]
pub struct AuthCache {
    bits: Vec<u64>,
    bit_count: usize,
    hash_count: u32,
    capacity: usize,
    false_positive_rate: f64,
    len: usize,
}

impl AuthCache {
    /// Creates an empty cache sized for `capacity` tags at the target
    /// false-positive rate.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if:
    /// - `false_positive_rate` is not strictly between 0 and 1
    /// - `capacity` is zero
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(false_positive_rate: f64, capacity: usize) -> Result<Self, RouterError> {
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(RouterError::invalid_false_positive_rate(false_positive_rate));
        }
        if capacity == 0 {
            return Err(RouterError::ZeroCapacity);
        }

        let ln2 = std::f64::consts::LN_2;
        let n = capacity as f64;

        // m = -n * ln(p) / (ln(2)^2)
        let bit_count = ((-n * false_positive_rate.ln() / (ln2 * ln2)).ceil() as usize).max(1);

        // k = (m/n) * ln(2)
        let hash_count = ((bit_count as f64 / n) * ln2).round() as u32;
        let hash_count = hash_count.clamp(1, MAX_HASH_COUNT);

        Ok(Self {
            bits: vec![0u64; bit_count.div_ceil(64)],
            bit_count,
            hash_count,
            capacity,
            false_positive_rate,
            len: 0,
        })
    }

    /// Creates a cache from a router configuration.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if the configuration's cache parameters are invalid.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Self::new(config.auth_cache_false_positive_rate, config.auth_cache_capacity)
    }

    /// Returns true if `tag` may have been inserted.
    #[must_use]
    pub fn contains(&self, tag: &AuthTag) -> bool {
        let found = self.indices(tag).all(|index| self.bit(index));
        tracing::trace!(found, "auth cache lookup");
        found
    }

    /// Adds `tag`. Inserting the same tag again changes nothing.
    pub fn insert(&mut self, tag: &AuthTag) {
        let mut changed = false;
        for index in self.indices(tag) {
            let mask = 1u64 << (index % 64);
            let word = &mut self.bits[index / 64];
            changed |= *word & mask == 0;
            *word |= mask;
        }
        if changed {
            self.len += 1;
        }
        tracing::trace!(changed, len = self.len, "auth cache insert");
    }

    /// Returns the number of insertions that set at least one new bit.
    ///
    /// Repeated insertions of one tag count once; a fresh tag whose bits
    /// were all already set is not counted.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been inserted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the filter size in bits.
    #[must_use]
    pub const fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Returns the number of hash functions.
    #[must_use]
    pub const fn hash_count(&self) -> u32 {
        self.hash_count
    }

    /// Returns the capacity the filter was sized for.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured target false-positive rate.
    #[must_use]
    pub const fn target_false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// Returns true once the cache holds at least its capacity.
    #[must_use]
    pub const fn is_saturated(&self) -> bool {
        self.len >= self.capacity
    }

    /// Estimates the current false-positive rate from the fraction of set
    /// bits, as `fill^k`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let set: u64 = self.bits.iter().map(|word| u64::from(word.count_ones())).sum();
        let fill = set as f64 / self.bit_count as f64;
        fill.powi(self.hash_count as i32)
    }

    fn bit(&self, index: usize) -> bool {
        self.bits[index / 64] & (1u64 << (index % 64)) != 0
    }

    fn indices(&self, tag: &AuthTag) -> impl Iterator<Item = usize> + use<> {
        let digest = Sha256::digest(tag.wire_encode());
        let mut first = [0u8; 8];
        let mut second = [0u8; 8];
        first.copy_from_slice(&digest[..8]);
        second.copy_from_slice(&digest[8..16]);
        let h1 = u64::from_be_bytes(first);
        let h2 = u64::from_be_bytes(second) | 1;
        let modulus = self.bit_count as u64;

        (0..u64::from(self.hash_count)).map(move |i| {
            let combined = h1.wrapping_add(i.wrapping_mul(h2)) % modulus;
            // combined < bit_count, which is a usize
            usize::try_from(combined).unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(i: u64) -> AuthTag {
        let mut tag = AuthTag::with_access_level(1).with_signature_value(vec![1, 2, 3]);
        tag.set_route_hash(i);
        tag
    }

    #[test]
    fn sizing_follows_formula() {
        let cache = AuthCache::new(1e-10, 10_000).unwrap();
        assert_eq!(cache.bit_count(), 479_253);
        assert_eq!(cache.hash_count(), 33);

        let cache = AuthCache::new(0.01, 1000).unwrap();
        assert_eq!(cache.bit_count(), 9_586);
        assert_eq!(cache.hash_count(), 7);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(AuthCache::new(0.0, 10).is_err());
        assert!(AuthCache::new(1.0, 10).is_err());
        assert_eq!(AuthCache::new(0.1, 0).unwrap_err(), RouterError::ZeroCapacity);
    }

    #[test]
    fn from_config_uses_defaults() {
        let cache = AuthCache::from_config(&RouterConfig::default()).unwrap();
        assert_eq!(cache.capacity(), 10_000);
        assert!(cache.is_empty());
    }

    #[test]
    fn inserted_tags_always_found() {
        let mut cache = AuthCache::new(0.01, 500).unwrap();
        for i in 0..500 {
            cache.insert(&tag(i));
        }
        for i in 0..500 {
            assert!(cache.contains(&tag(i)), "false negative for {i}");
        }
    }

    #[test]
    fn insert_is_idempotent() {
        let mut cache = AuthCache::new(1e-6, 100).unwrap();
        cache.insert(&tag(1));
        let bits = cache.bits.clone();
        cache.insert(&tag(1));
        assert_eq!(cache.bits, bits);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn false_positive_rate_near_target() {
        let mut cache = AuthCache::new(0.01, 1000).unwrap();
        for i in 0..1000 {
            cache.insert(&tag(i));
        }
        let false_positives = (1000..21_000).filter(|i| cache.contains(&tag(*i))).count();
        let rate = f64::from(u32::try_from(false_positives).unwrap()) / 20_000.0;
        assert!(rate < 0.02, "observed false-positive rate {rate}");
        assert!(cache.estimated_false_positive_rate() < 0.02);
    }

    #[test]
    fn saturation_degrades_without_failing() {
        let mut cache = AuthCache::new(0.01, 10).unwrap();
        for i in 0..200 {
            cache.insert(&tag(i));
        }
        assert!(cache.is_saturated());
        assert!(cache.estimated_false_positive_rate() > 0.01);
        assert!(cache.contains(&tag(0)));
    }

    #[test]
    fn different_route_hash_is_a_different_member() {
        let mut cache = AuthCache::new(1e-10, 100).unwrap();
        cache.insert(&tag(1));
        assert!(!cache.contains(&tag(2)));
    }
}
