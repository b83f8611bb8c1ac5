//! Requests for named data.

use crate::auth_tag::AuthTag;
use crate::name::Name;

/// Converts a release probability in `[0, 1]` into the integer hint carried
/// by an [`Interest`].
///
/// A hint `h` releases cached content without verification with probability
/// `h / 2^32`. Out-of-range and NaN inputs are clamped. The largest hint is
/// `u32::MAX`, so `1.0` means almost always: one draw in 2^32 still misses
/// and falls through to verification.
///
/// # Examples
///
/// ```
/// use ndntac::auth_validity_hint;
///
/// assert_eq!(auth_validity_hint(0.0), 0);
/// // Not quite certain: a draw of u32::MAX misses.
/// assert_eq!(auth_validity_hint(1.0), u32::MAX);
/// assert_eq!(auth_validity_hint(0.5), 1 << 31);
/// ```
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn auth_validity_hint(probability: f64) -> u32 {
    if probability.is_nan() || probability <= 0.0 {
        return 0;
    }
    let scaled = (probability * 4_294_967_296.0).floor();
    if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// A request for the data under a name, optionally carrying a capability.
///
/// # Examples
///
/// ```
/// use ndntac::{AuthTag, Interest, Name};
///
/// let interest = Interest::new(Name::parse("/video/clip").unwrap())
///     .with_auth_tag(AuthTag::with_access_level(1))
///     .with_auth_validity_probability(0);
///
/// assert!(interest.auth_tag().is_present());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    auth_tag: AuthTag,
    auth_validity_probability: u32,
}

impl Interest {
    /// Creates an interest with no tag and a zero validity hint.
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self {
            name,
            auth_tag: AuthTag::new(),
            auth_validity_probability: 0,
        }
    }

    /// Attaches a tag.
    #[must_use]
    pub fn with_auth_tag(mut self, tag: AuthTag) -> Self {
        self.auth_tag = tag;
        self
    }

    /// Sets the validity hint; see [`auth_validity_hint`].
    #[must_use]
    pub const fn with_auth_validity_probability(mut self, hint: u32) -> Self {
        self.auth_validity_probability = hint;
        self
    }

    /// Returns the requested name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the carried tag; an absent tag has access level 0.
    #[must_use]
    pub const fn auth_tag(&self) -> &AuthTag {
        &self.auth_tag
    }

    /// Replaces the carried tag.
    pub fn set_auth_tag(&mut self, tag: AuthTag) {
        self.auth_tag = tag;
    }

    /// Returns the validity hint.
    #[must_use]
    pub const fn auth_validity_probability(&self) -> u32 {
        self.auth_validity_probability
    }

    /// Sets the validity hint.
    pub fn set_auth_validity_probability(&mut self, hint: u32) {
        self.auth_validity_probability = hint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interest_carries_no_tag() {
        let interest = Interest::new(Name::parse("/a").unwrap());
        assert!(!interest.auth_tag().is_present());
        assert_eq!(interest.auth_validity_probability(), 0);
    }

    #[test]
    fn hint_clamps_out_of_range() {
        assert_eq!(auth_validity_hint(-1.0), 0);
        assert_eq!(auth_validity_hint(f64::NAN), 0);
        assert_eq!(auth_validity_hint(2.0), u32::MAX);
        assert_eq!(auth_validity_hint(0.25), 1 << 30);
    }
}
