//! Validity periods bounding when a signature may be used.

use chrono::{DateTime, Utc};

use crate::constants::{UNBOUNDED_END_MILLIS, tlv_type};
use crate::error::{DecodeError, DecodeErrorKind, ValidityPeriodError};
use crate::tlv::{TlvEncoder, TlvReader, decode_nonneg, set_once};

/// Returns the earliest representable activation time (the Unix epoch).
///
/// A period starting here is unbounded in the past.
#[must_use]
pub fn unbounded_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Returns the latest representable expiration time (9999-12-31T23:59:59Z).
///
/// A period ending here is unbounded in the future.
#[must_use]
pub fn unbounded_end() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(UNBOUNDED_END_MILLIS).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Clamps to the representable range and truncates to millisecond precision,
/// so a period compares equal to its own decoded wire form.
fn normalize(time: DateTime<Utc>) -> DateTime<Utc> {
    let millis = time.timestamp_millis().clamp(0, UNBOUNDED_END_MILLIS);
    DateTime::from_timestamp_millis(millis).unwrap_or_else(unbounded_start)
}

/// The interval `[not_before, not_after]` during which a signature is valid.
///
/// Times are stored with millisecond precision between the Unix epoch and
/// 9999-12-31T23:59:59Z; values outside that range are clamped.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use ndntac::ValidityPeriod;
///
/// let now = Utc::now();
/// let period = ValidityPeriod::new(now - Duration::hours(1), now + Duration::hours(1)).unwrap();
///
/// assert!(period.contains(now));
/// assert!(!period.contains(now + Duration::hours(2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidityPeriod {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl ValidityPeriod {
    /// Creates a period.
    ///
    /// # Errors
    ///
    /// Returns `ValidityPeriodError::Inverted` if `not_before` is after `not_after`.
    pub fn new(
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> Result<Self, ValidityPeriodError> {
        let not_before = normalize(not_before);
        let not_after = normalize(not_after);
        if not_before > not_after {
            return Err(ValidityPeriodError::Inverted {
                not_before: not_before.to_rfc3339(),
                not_after: not_after.to_rfc3339(),
            });
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// Creates a period unbounded on both sides.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            not_before: unbounded_start(),
            not_after: unbounded_end(),
        }
    }

    /// Returns the start of the period.
    #[must_use]
    pub const fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// Returns the end of the period.
    #[must_use]
    pub const fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Moves the start; an end earlier than the new start is moved with it.
    pub fn set_not_before(&mut self, time: DateTime<Utc>) {
        self.not_before = normalize(time);
        if self.not_after < self.not_before {
            self.not_after = self.not_before;
        }
    }

    /// Moves the end; a start later than the new end is moved with it.
    pub fn set_not_after(&mut self, time: DateTime<Utc>) {
        self.not_after = normalize(time);
        if self.not_before > self.not_after {
            self.not_before = self.not_after;
        }
    }

    /// Returns true if `now` lies within the period, bounds included.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now <= self.not_after
    }

    pub(crate) fn encode_into(&self, encoder: &mut TlvEncoder) {
        encoder.write_nested(tlv_type::VALIDITY_PERIOD, |inner| {
            inner.write_nonneg(tlv_type::NOT_BEFORE, to_wire_millis(self.not_before));
            inner.write_nonneg(tlv_type::NOT_AFTER, to_wire_millis(self.not_after));
        });
    }

    pub(crate) fn decode_value(value: &[u8]) -> Result<Self, DecodeError> {
        const ELEMENT: &str = "ValidityPeriod";
        let mut reader = TlvReader::new(value, ELEMENT);
        let not_before = from_wire_millis(decode_nonneg(
            reader.expect_element(tlv_type::NOT_BEFORE)?,
            ELEMENT,
        )?)?;
        let not_after = from_wire_millis(decode_nonneg(
            reader.expect_element(tlv_type::NOT_AFTER)?,
            ELEMENT,
        )?)?;
        reader.finish()?;

        if not_before > not_after {
            return Err(DecodeError::new(
                ELEMENT,
                DecodeErrorKind::InvalidValidityPeriod,
            ));
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

impl Default for ValidityPeriod {
    fn default() -> Self {
        Self::unbounded()
    }
}

fn to_wire_millis(time: DateTime<Utc>) -> u64 {
    u64::try_from(time.timestamp_millis()).unwrap_or(0)
}

fn from_wire_millis(millis: u64) -> Result<DateTime<Utc>, DecodeError> {
    let invalid = || DecodeError::new("ValidityPeriod", DecodeErrorKind::InvalidTimestamp { millis });
    let signed = i64::try_from(millis).map_err(|_| invalid())?;
    if signed > UNBOUNDED_END_MILLIS {
        return Err(invalid());
    }
    DateTime::from_timestamp_millis(signed).ok_or_else(invalid)
}

pub(crate) fn decode_period_once(
    slot: &mut Option<ValidityPeriod>,
    value: &[u8],
    element: &'static str,
) -> Result<(), DecodeError> {
    set_once(
        slot,
        ValidityPeriod::decode_value(value)?,
        tlv_type::VALIDITY_PERIOD,
        element,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn encode(period: &ValidityPeriod) -> Vec<u8> {
        let mut encoder = TlvEncoder::new();
        period.encode_into(&mut encoder);
        encoder.into_bytes()
    }

    fn decode(bytes: &[u8]) -> Result<ValidityPeriod, DecodeError> {
        let mut reader = TlvReader::new(bytes, "test");
        let value = reader.expect_element(tlv_type::VALIDITY_PERIOD)?;
        ValidityPeriod::decode_value(value)
    }

    #[test]
    fn inverted_period_rejected() {
        let now = Utc::now();
        let result = ValidityPeriod::new(now, now - Duration::seconds(1));
        assert!(matches!(result, Err(ValidityPeriodError::Inverted { .. })));
    }

    #[test]
    fn single_instant_allowed() {
        let now = Utc::now();
        let period = ValidityPeriod::new(now, now).unwrap();
        assert_eq!(period.not_before(), period.not_after());
    }

    #[test]
    fn bounds_are_inclusive() {
        let start = DateTime::from_timestamp_millis(1_000_000).unwrap();
        let end = DateTime::from_timestamp_millis(2_000_000).unwrap();
        let period = ValidityPeriod::new(start, end).unwrap();
        assert!(period.contains(start));
        assert!(period.contains(end));
        assert!(!period.contains(start - Duration::milliseconds(1)));
        assert!(!period.contains(end + Duration::milliseconds(1)));
    }

    #[test]
    fn unbounded_contains_now() {
        assert!(ValidityPeriod::unbounded().contains(Utc::now()));
        assert_eq!(ValidityPeriod::default(), ValidityPeriod::unbounded());
    }

    #[test]
    fn pre_epoch_clamps_to_start() {
        let before_epoch = DateTime::from_timestamp_millis(-5_000).unwrap();
        let period = ValidityPeriod::new(before_epoch, Utc::now()).unwrap();
        assert_eq!(period.not_before(), unbounded_start());
    }

    #[test]
    fn setters_keep_order() {
        let now = Utc::now();
        let mut period = ValidityPeriod::new(now, now + Duration::hours(1)).unwrap();

        period.set_not_before(now + Duration::hours(2));
        assert_eq!(period.not_before(), period.not_after());

        period.set_not_after(now);
        assert_eq!(period.not_before(), period.not_after());
        assert_eq!(period.not_after(), normalize(now));
    }

    #[test]
    fn wire_round_trip_preserves_millis() {
        let now = Utc::now();
        let period = ValidityPeriod::new(now, now + Duration::days(30)).unwrap();
        assert_eq!(decode(&encode(&period)).unwrap(), period);
        assert_eq!(
            decode(&encode(&ValidityPeriod::unbounded())).unwrap(),
            ValidityPeriod::unbounded()
        );
    }

    #[test]
    fn decode_rejects_inverted_period() {
        let mut encoder = TlvEncoder::new();
        encoder.write_nested(tlv_type::VALIDITY_PERIOD, |inner| {
            inner.write_nonneg(tlv_type::NOT_BEFORE, 2_000);
            inner.write_nonneg(tlv_type::NOT_AFTER, 1_000);
        });
        let err = decode(&encoder.into_bytes()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidValidityPeriod);
    }

    #[test]
    fn decode_rejects_out_of_range_timestamp() {
        let mut encoder = TlvEncoder::new();
        encoder.write_nested(tlv_type::VALIDITY_PERIOD, |inner| {
            inner.write_nonneg(tlv_type::NOT_BEFORE, 0);
            inner.write_nonneg(tlv_type::NOT_AFTER, u64::MAX);
        });
        let err = decode(&encoder.into_bytes()).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::InvalidTimestamp { .. }));
    }
}
