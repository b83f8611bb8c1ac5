//! Error types for router construction and accounting.

use std::fmt;

use crate::RouterId;

/// Errors raised when building a router from an invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterError {
    /// The cache's target false-positive rate is not strictly between 0 and 1.
    InvalidFalsePositiveRate {
        /// The rejected rate
        rate: f64,
    },
    /// The cache's expected capacity is zero.
    ZeroCapacity,
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFalsePositiveRate { rate } => {
                write!(
                    f,
                    "auth cache false-positive rate {rate} must be greater than 0 and less than 1"
                )
            }
            Self::ZeroCapacity => {
                write!(f, "auth cache capacity must be at least 1")
            }
        }
    }
}

impl std::error::Error for RouterError {}

impl RouterError {
    /// Creates an `InvalidFalsePositiveRate` error.
    #[must_use]
    pub const fn invalid_false_positive_rate(rate: f64) -> Self {
        Self::InvalidFalsePositiveRate { rate }
    }
}

/// Errors reported by an accounting collaborator.
///
/// Accounting is best-effort: the router logs these and carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountingError {
    /// The sink cannot accept events right now.
    Unavailable {
        /// Why the sink refused the event
        reason: String,
    },
    /// The router was never registered.
    UnknownRouter {
        /// The unregistered router
        router: RouterId,
    },
}

impl fmt::Display for AccountingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "accounting unavailable: {reason}"),
            Self::UnknownRouter { router } => {
                write!(f, "router {router} is not registered with accounting")
            }
        }
    }
}

impl std::error::Error for AccountingError {}

impl AccountingError {
    /// Creates an `Unavailable` error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns true if the router was unknown to the sink.
    #[must_use]
    pub const fn is_unknown_router(&self) -> bool {
        matches!(self, Self::UnknownRouter { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn false_positive_rate_display() {
        let err = RouterError::invalid_false_positive_rate(1.5);
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn zero_capacity_display() {
        assert!(RouterError::ZeroCapacity.to_string().contains("at least 1"));
    }

    #[test]
    fn accounting_errors() {
        let err = AccountingError::unavailable("disk full");
        assert!(err.to_string().contains("disk full"));
        assert!(!err.is_unknown_router());

        let err = AccountingError::UnknownRouter {
            router: RouterId::new(9),
        };
        assert!(err.is_unknown_router());
        assert!(err.to_string().contains("router 9"));
    }
}
