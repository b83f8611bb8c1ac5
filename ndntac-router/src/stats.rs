//! Per-router counters aggregated from accounting events.

use std::collections::BTreeMap;

/// Event counts for one router.
///
/// Built by [`RecordingAccounting::stats`](crate::RecordingAccounting::stats).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Requests received.
    pub received: usize,
    /// Requests answered with content.
    pub satisfied: usize,
    /// Requests refused, including upstream denials.
    pub denied: usize,
    /// Requests forwarded upstream on a local miss.
    pub forwarded: usize,
    /// Upstream confirmations of a tag.
    pub auth_satisfied: usize,
    /// Free-form events.
    pub other: usize,
    /// Denials keyed by reason string.
    pub denials_by_reason: BTreeMap<String, usize>,
}

impl RouterStats {
    /// Creates empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of requests received.
    #[must_use]
    pub const fn received(&self) -> usize {
        self.received
    }

    /// Returns the number of requests satisfied.
    #[must_use]
    pub const fn satisfied(&self) -> usize {
        self.satisfied
    }

    /// Returns the number of requests denied.
    #[must_use]
    pub const fn denied(&self) -> usize {
        self.denied
    }

    /// Returns the number of requests forwarded.
    #[must_use]
    pub const fn forwarded(&self) -> usize {
        self.forwarded
    }

    /// Returns the number of tag confirmations seen.
    #[must_use]
    pub const fn auth_satisfied(&self) -> usize {
        self.auth_satisfied
    }

    /// Returns the number of denials recorded with `reason`.
    #[must_use]
    pub fn denials_for(&self, reason: &str) -> usize {
        self.denials_by_reason.get(reason).copied().unwrap_or(0)
    }

    /// Returns the fraction of decided requests that were satisfied.
    #[must_use]
    pub fn satisfaction_ratio(&self) -> f64 {
        // Saturate for stats safety
        let satisfied = u32::try_from(self.satisfied).unwrap_or(u32::MAX);
        let decided = u32::try_from(self.satisfied + self.denied).unwrap_or(u32::MAX);
        if decided > 0 {
            f64::from(satisfied) / f64::from(decided)
        } else {
            0.0
        }
    }
}
