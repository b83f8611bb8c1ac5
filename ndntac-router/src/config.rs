//! Configuration for a forwarding node's admission control.

use std::time::Duration;

use crate::RouterError;

/// Configuration for a router strategy.
///
/// Controls the verification cache's sizing, the simulated processing
/// delays charged to the outbound queue, and the random source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterConfig {
    /// Target false-positive rate of the verification cache.
    ///
    /// Must be strictly between 0 and 1.
    /// Default: 1e-10
    pub auth_cache_false_positive_rate: f64,

    /// Number of tags the verification cache is sized for.
    ///
    /// Beyond this the false-positive rate degrades.
    /// Default: 10000
    pub auth_cache_capacity: usize,

    /// Delay charged for a full signature verification.
    ///
    /// Default: 30345 ns
    pub signature_delay: Duration,

    /// Delay charged for a verification cache lookup.
    ///
    /// Default: 2535 ns
    pub bloom_delay: Duration,

    /// Delay charged for every incoming request.
    ///
    /// Default: zero
    pub interest_delay: Duration,

    /// Seed for the delegation draw.
    ///
    /// None seeds from entropy.
    /// Default: None
    pub rng_seed: Option<u64>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            auth_cache_false_positive_rate: 1e-10,
            auth_cache_capacity: 10_000,
            signature_delay: Duration::from_nanos(30_345),
            bloom_delay: Duration::from_nanos(2_535),
            interest_delay: Duration::ZERO,
            rng_seed: None,
        }
    }
}

impl RouterConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache's target false-positive rate.
    #[must_use]
    pub const fn with_auth_cache_false_positive_rate(mut self, rate: f64) -> Self {
        self.auth_cache_false_positive_rate = rate;
        self
    }

    /// Sets the cache's expected capacity.
    #[must_use]
    pub const fn with_auth_cache_capacity(mut self, capacity: usize) -> Self {
        self.auth_cache_capacity = capacity;
        self
    }

    /// Sets the signature verification delay.
    #[must_use]
    pub const fn with_signature_delay(mut self, delay: Duration) -> Self {
        self.signature_delay = delay;
        self
    }

    /// Sets the cache lookup delay.
    #[must_use]
    pub const fn with_bloom_delay(mut self, delay: Duration) -> Self {
        self.bloom_delay = delay;
        self
    }

    /// Sets the per-request delay.
    #[must_use]
    pub const fn with_interest_delay(mut self, delay: Duration) -> Self {
        self.interest_delay = delay;
        self
    }

    /// Fixes the random seed.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Checks the cache parameters.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if:
    /// - The false-positive rate is not strictly between 0 and 1
    /// - The capacity is zero
    pub fn validate(&self) -> Result<(), RouterError> {
        let rate = self.auth_cache_false_positive_rate;
        if !(rate > 0.0 && rate < 1.0) {
            return Err(RouterError::invalid_false_positive_rate(rate));
        }
        if self.auth_cache_capacity == 0 {
            return Err(RouterError::ZeroCapacity);
        }
        Ok(())
    }
}
