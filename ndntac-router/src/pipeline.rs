//! The ordered admission checks run on a local content hit.

use std::time::Duration;

use chrono::{DateTime, Utc};
use ndntac::{AuthTag, Data};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    AdmissionOutcome, AuthCache, DelayCharge, DelayKind, DenialReason, Disposition, ReleasePath,
    RouterConfig, RouterError,
};

/// Runs the deterministic credential checks on a tag against restricted
/// content.
///
/// In order: access level, expiry at `now`, prefix coverage, presence of a
/// content key locator, and key locator agreement. Returns the first
/// failure. Touches neither randomness nor the cache.
///
/// # Errors
///
/// Returns the `DenialReason` of the first failing check.
pub fn check_credentials(
    tag: &AuthTag,
    data: &Data,
    now: DateTime<Utc>,
) -> Result<(), DenialReason> {
    if data.access_level() > tag.access_level() {
        return Err(DenialReason::AccessLevelTooLow);
    }
    if tag.is_expired_at(now) {
        return Err(DenialReason::TokenExpired);
    }
    if !tag.prefix().is_prefix_of(data.name()) {
        return Err(DenialReason::PrefixMismatch);
    }
    let Some(content_key) = data.signature().key_locator() else {
        return Err(DenialReason::NoKeyLocator);
    };
    if tag.key_locator() != Some(content_key) {
        return Err(DenialReason::KeyLocatorMismatch);
    }
    Ok(())
}

/// Decides whether cached content may be released for a request's tag.
///
/// Owns the verification cache and the random source for the delegation
/// draw. Checks run in a fixed order and stop at the first verdict:
///
/// 1. Public content (level 0) is released.
/// 2. [`check_credentials`] may deny.
/// 3. With a nonzero hint `h`, a draw below `h` releases; otherwise the
///    response is marked not re-cacheable and the cache is skipped.
/// 4. With a zero hint, a cache hit releases.
/// 5. A signature that verifies releases and is cached; any other is denied.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use ndntac::{AuthTag, Data, KeyLocator, Name, Signature};
/// use ndntac_router::{AdmissionPipeline, ReleasePath, Disposition, RouterConfig};
///
/// let key = KeyLocator::Name(Name::parse("/org/KEY/1").unwrap());
/// let data = Data::new(Name::parse("/org/report").unwrap())
///     .with_access_level(2)
///     .with_signature(Signature::new().with_key_locator(key.clone()).with_value(vec![1]));
/// let tag = AuthTag::with_access_level(2)
///     .with_prefix(Name::parse("/org").unwrap())
///     .with_key_locator(key)
///     .with_signature_value(vec![0x7f]);
///
/// let mut pipeline = AdmissionPipeline::from_config(&RouterConfig::default().with_rng_seed(1)).unwrap();
///
/// let first = pipeline.evaluate(&tag, &data, 0, Utc::now());
/// assert_eq!(first.disposition, Disposition::Release(ReleasePath::SignatureVerified));
///
/// let second = pipeline.evaluate(&tag, &data, 0, Utc::now());
/// assert_eq!(second.disposition, Disposition::Release(ReleasePath::CacheHit));
/// ```
#[derive(Debug, Clone)]
pub struct AdmissionPipeline<R = ChaCha8Rng> {
    cache: AuthCache,
    rng: R,
    signature_delay: Duration,
    bloom_delay: Duration,
}

impl AdmissionPipeline<ChaCha8Rng> {
    /// Creates a pipeline seeded from the configuration, or from entropy if
    /// no seed is set.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if the configuration is invalid.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> AdmissionPipeline<R> {
    /// Creates a pipeline drawing from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if the configuration is invalid.
    pub fn with_rng(config: &RouterConfig, rng: R) -> Result<Self, RouterError> {
        config.validate()?;
        Ok(Self {
            cache: AuthCache::from_config(config)?,
            rng,
            signature_delay: config.signature_delay,
            bloom_delay: config.bloom_delay,
        })
    }

    /// Returns the verification cache.
    #[must_use]
    pub const fn auth_cache(&self) -> &AuthCache {
        &self.cache
    }

    /// Returns the verification cache for seeding or inspection.
    pub fn auth_cache_mut(&mut self) -> &mut AuthCache {
        &mut self.cache
    }

    /// Evaluates `tag` against `data`.
    ///
    /// `hint` is the request's validity hint: a draw releases with
    /// probability `hint / 2^32`, and 0 means no hint. `now` is the instant
    /// expiry is judged at.
    pub fn evaluate(
        &mut self,
        tag: &AuthTag,
        data: &Data,
        hint: u32,
        now: DateTime<Utc>,
    ) -> AdmissionOutcome {
        let outcome = self.decide(tag, data, hint, now);
        tracing::debug!(
            name = %data.name(),
            required = data.access_level(),
            granted = tag.access_level(),
            hint,
            disposition = ?outcome.disposition,
            delay_ns = outcome.total_delay().as_nanos(),
            "admission verdict"
        );
        outcome
    }

    fn decide(
        &mut self,
        tag: &AuthTag,
        data: &Data,
        hint: u32,
        now: DateTime<Utc>,
    ) -> AdmissionOutcome {
        if data.access_level() == 0 {
            return AdmissionOutcome::new(Disposition::Release(ReleasePath::PublicContent));
        }
        if let Err(reason) = check_credentials(tag, data, now) {
            return AdmissionOutcome::new(Disposition::Deny(reason));
        }

        let mut outcome = AdmissionOutcome::new(Disposition::Deny(DenialReason::InvalidSignature));

        if hint > 0 {
            if self.rng.next_u32() < hint {
                outcome.disposition = Disposition::Release(ReleasePath::Delegated);
                return outcome;
            }
            outcome.no_recache = true;
        } else {
            outcome.delays.push(DelayCharge {
                kind: DelayKind::BloomLookup,
                duration: self.bloom_delay,
            });
            if self.cache.contains(tag) {
                outcome.disposition = Disposition::Release(ReleasePath::CacheHit);
                return outcome;
            }
        }

        outcome.delays.push(DelayCharge {
            kind: DelayKind::SignatureVerification,
            duration: self.signature_delay,
        });
        if tag.signature().carries_valid_marker() {
            self.cache.insert(tag);
            outcome.cache_inserted = true;
            outcome.disposition = Disposition::Release(ReleasePath::SignatureVerified);
        }
        outcome
    }
}
