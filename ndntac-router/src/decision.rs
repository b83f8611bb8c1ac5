//! Admission verdicts and the costs charged while reaching them.

use std::fmt;
use std::time::Duration;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DenialReason {
    /// The tag grants a lower level than the content requires.
    AccessLevelTooLow,
    /// The current time is outside the tag's validity period.
    TokenExpired,
    /// The tag's prefix does not cover the content name.
    PrefixMismatch,
    /// The content's signature names no key.
    NoKeyLocator,
    /// The tag and the content name different signing keys.
    KeyLocatorMismatch,
    /// The tag's signature did not verify.
    InvalidSignature,
}

impl DenialReason {
    /// Returns the reason string reported to accounting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessLevelTooLow => "AuthTag access level is too low",
            Self::TokenExpired => "AuthTag is expired",
            Self::PrefixMismatch => "AuthTag prefix does not match data",
            Self::NoKeyLocator => "Requested data has no key locator",
            Self::KeyLocatorMismatch => "AuthTag key locator does not match data key locator",
            Self::InvalidSignature => "Invalid AuthTag signature",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check released the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReleasePath {
    /// The content requires no tag.
    PublicContent,
    /// The delegation draw fell under the request's hint.
    Delegated,
    /// The tag was found in the verification cache.
    CacheHit,
    /// The tag's signature verified.
    SignatureVerified,
}

/// What happens to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Disposition {
    /// The content is sent.
    Release(ReleasePath),
    /// A denial wrapping the content is sent.
    Deny(DenialReason),
    /// Nothing matched locally; the request goes upstream.
    Forwarded,
}

impl Disposition {
    /// Returns true for a release.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self, Self::Release(_))
    }

    /// Returns true for a denial.
    #[must_use]
    pub const fn is_deny(&self) -> bool {
        matches!(self, Self::Deny(_))
    }

    /// Returns the denial reason, if any.
    #[must_use]
    pub const fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Deny(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// The kind of simulated work a delay stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelayKind {
    /// A verification cache lookup.
    BloomLookup,
    /// A full signature verification.
    SignatureVerification,
}

/// A processing delay incurred while admitting a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayCharge {
    /// What the delay stands for
    pub kind: DelayKind,
    /// How long
    pub duration: Duration,
}

/// The result of running the admission checks on one request.
///
/// The pipeline reports delays rather than incurring them; the caller hands
/// them to its outbound queue in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionOutcome {
    /// The verdict
    pub disposition: Disposition,
    /// Delays in the order incurred
    pub delays: Vec<DelayCharge>,
    /// Whether the response must be marked as not re-cacheable downstream
    pub no_recache: bool,
    /// Whether the tag was added to the verification cache
    pub cache_inserted: bool,
}

impl AdmissionOutcome {
    pub(crate) const fn new(disposition: Disposition) -> Self {
        Self {
            disposition,
            delays: Vec::new(),
            no_recache: false,
            cache_inserted: false,
        }
    }

    /// Returns true if the content is released.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        self.disposition.is_release()
    }

    /// Returns the denial reason, if the request was refused.
    #[must_use]
    pub const fn denial_reason(&self) -> Option<DenialReason> {
        self.disposition.denial_reason()
    }

    /// Returns the sum of all charged delays.
    #[must_use]
    pub fn total_delay(&self) -> Duration {
        self.delays.iter().map(|charge| charge.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings_are_stable() {
        assert_eq!(
            DenialReason::AccessLevelTooLow.to_string(),
            "AuthTag access level is too low"
        );
        assert_eq!(DenialReason::InvalidSignature.as_str(), "Invalid AuthTag signature");
    }

    #[test]
    fn disposition_predicates() {
        let release = Disposition::Release(ReleasePath::CacheHit);
        assert!(release.is_release());
        assert!(release.denial_reason().is_none());

        let deny = Disposition::Deny(DenialReason::TokenExpired);
        assert!(deny.is_deny());
        assert_eq!(deny.denial_reason(), Some(DenialReason::TokenExpired));

        assert!(!Disposition::Forwarded.is_release());
        assert!(!Disposition::Forwarded.is_deny());
    }

    #[test]
    fn total_delay_sums_charges() {
        let mut outcome = AdmissionOutcome::new(Disposition::Release(ReleasePath::SignatureVerified));
        outcome.delays.push(DelayCharge {
            kind: DelayKind::BloomLookup,
            duration: Duration::from_nanos(10),
        });
        outcome.delays.push(DelayCharge {
            kind: DelayKind::SignatureVerification,
            duration: Duration::from_nanos(32),
        });
        assert_eq!(outcome.total_delay(), Duration::from_nanos(42));
    }
}
