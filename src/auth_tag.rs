//! The capability token carried by requests.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use crate::constants::tlv_type;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::key_locator::KeyLocator;
use crate::name::Name;
use crate::signature::Signature;
use crate::tlv::{TlvEncoder, TlvReader, decode_nonneg, set_once};
use crate::validity_period::{ValidityPeriod, unbounded_end, unbounded_start};

const ELEMENT: &str = "AuthTag";

/// A capability token authorizing access under one name prefix.
///
/// A tag grants access to content under [`prefix`](Self::prefix) whose
/// required access level is at most [`access_level`](Self::access_level).
/// Level 0 means "no tag"; see [`is_present`](Self::is_present).
///
/// The serialized form is computed lazily and cached. Every setter drops the
/// cache, so [`wire_encode`](Self::wire_encode) always reflects the current
/// fields. Equality and hashing compare serialized forms.
///
/// # Wire format
///
/// ```text
/// AuthTag(200) {
///   Name                     prefix
///   AccessLevel(201)         non-negative integer, <= 255
///   RouteHash(202)           non-negative integer
///   [ConsumerLocator(203)]   key locator body
///   SignatureInfo(22)        type, [key locator], [validity period]
///   SignatureValue(23)
/// }
/// ```
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use ndntac::{AuthTag, KeyLocator, Name};
///
/// let mut tag = AuthTag::with_access_level(3)
///     .with_prefix(Name::parse("/hospital/records").unwrap())
///     .with_key_locator(KeyLocator::Name(Name::parse("/hospital/KEY/1").unwrap()))
///     .with_signature_value(vec![0x42; 32]);
/// tag.set_expiration_time(Utc::now() + Duration::hours(1));
///
/// assert!(tag.is_present());
/// assert!(!tag.is_expired());
///
/// let wire = tag.wire_encode().to_vec();
/// let decoded = AuthTag::from_wire(&wire).unwrap();
/// assert_eq!(decoded, tag);
/// ```
#[derive(Debug, Clone)]
pub struct AuthTag {
    prefix: Name,
    access_level: u8,
    route_hash: u64,
    consumer_locator: Option<KeyLocator>,
    signature: Signature,
    wire: OnceLock<Vec<u8>>,
}

impl Default for AuthTag {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthTag {
    /// Creates an empty tag: root prefix, access level 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: Name::new(),
            access_level: 0,
            route_hash: 0,
            consumer_locator: None,
            signature: Signature::new(),
            wire: OnceLock::new(),
        }
    }

    /// Creates a tag granting the given access level.
    #[must_use]
    pub fn with_access_level(access_level: u8) -> Self {
        Self {
            access_level,
            ..Self::new()
        }
    }

    /// Decodes a tag from its wire form.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the input is not exactly one well-formed tag.
    pub fn from_wire(wire: &[u8]) -> Result<Self, DecodeError> {
        let mut tag = Self::new();
        tag.wire_decode(wire)?;
        Ok(tag)
    }

    fn on_changed(&mut self) {
        self.wire = OnceLock::new();
    }

    /// Returns the serialized form, computing and caching it if needed.
    #[must_use]
    pub fn wire_encode(&self) -> &[u8] {
        self.wire.get_or_init(|| self.encode())
    }

    /// Returns true if a serialized form is currently cached.
    #[must_use]
    pub fn has_wire(&self) -> bool {
        self.wire.get().is_some()
    }

    fn encode(&self) -> Vec<u8> {
        let mut encoder = TlvEncoder::new();
        encoder.write_nested(tlv_type::AUTH_TAG, |inner| {
            self.prefix.encode_into(inner);
            inner.write_nonneg(tlv_type::ACCESS_LEVEL, u64::from(self.access_level));
            inner.write_nonneg(tlv_type::ROUTE_HASH, self.route_hash);
            if let Some(locator) = &self.consumer_locator {
                locator.encode_into(inner, tlv_type::CONSUMER_LOCATOR);
            }
            self.signature.encode_into(inner);
        });
        encoder.into_bytes()
    }

    /// Replaces every field with those decoded from `wire`.
    ///
    /// The cached serialized form is dropped rather than seeded from `wire`,
    /// since a non-canonical input would not match the re-encoding. On
    /// failure the tag is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the input does not match the tag schema.
    pub fn wire_decode(&mut self, wire: &[u8]) -> Result<(), DecodeError> {
        let mut outer = TlvReader::new(wire, ELEMENT);
        let body = outer.expect_element(tlv_type::AUTH_TAG)?;
        outer.finish()?;

        let mut reader = TlvReader::new(body, ELEMENT);
        let prefix = Name::decode_value(reader.expect_element(tlv_type::NAME)?)?;

        let level = decode_nonneg(reader.expect_element(tlv_type::ACCESS_LEVEL)?, ELEMENT)?;
        let access_level = u8::try_from(level).map_err(|_| {
            DecodeError::new(
                ELEMENT,
                DecodeErrorKind::IntegerOutOfRange {
                    value: level,
                    max: u64::from(u8::MAX),
                },
            )
        })?;

        let route_hash = decode_nonneg(reader.expect_element(tlv_type::ROUTE_HASH)?, ELEMENT)?;

        let mut consumer_locator = None;
        while reader.peek_type() == Some(tlv_type::CONSUMER_LOCATOR) {
            let value = reader.expect_element(tlv_type::CONSUMER_LOCATOR)?;
            set_once(
                &mut consumer_locator,
                KeyLocator::decode_value(value)?,
                tlv_type::CONSUMER_LOCATOR,
                ELEMENT,
            )?;
        }

        let info = reader.expect_element(tlv_type::SIGNATURE_INFO)?;
        let value = reader.expect_element(tlv_type::SIGNATURE_VALUE)?;
        reader.finish()?;
        let signature = Signature::decode_parts(info, value)?;

        *self = Self {
            prefix,
            access_level,
            route_hash,
            consumer_locator,
            signature,
            wire: OnceLock::new(),
        };
        Ok(())
    }

    /// Returns the name prefix this tag authorizes.
    #[must_use]
    pub const fn prefix(&self) -> &Name {
        &self.prefix
    }

    /// Sets the name prefix.
    pub fn set_prefix(&mut self, prefix: Name) {
        self.on_changed();
        self.prefix = prefix;
    }

    /// Sets the name prefix, returning the tag.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Name) -> Self {
        self.set_prefix(prefix);
        self
    }

    /// Returns the granted access level.
    #[must_use]
    pub const fn access_level(&self) -> u8 {
        self.access_level
    }

    /// Sets the granted access level.
    pub fn set_access_level(&mut self, access_level: u8) {
        self.on_changed();
        self.access_level = access_level;
    }

    /// Returns true if this tag grants anything (access level is nonzero).
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.access_level != 0
    }

    /// Returns the route hash correlating the tag with a delivery path.
    #[must_use]
    pub const fn route_hash(&self) -> u64 {
        self.route_hash
    }

    /// Sets the route hash.
    ///
    /// The route hash is part of the wire form, so this drops the cached
    /// encoding like every other setter.
    pub fn set_route_hash(&mut self, route_hash: u64) {
        self.on_changed();
        self.route_hash = route_hash;
    }

    /// Returns the locator of the consumer's key, if recorded.
    #[must_use]
    pub const fn consumer_locator(&self) -> Option<&KeyLocator> {
        self.consumer_locator.as_ref()
    }

    /// Sets the locator of the consumer's key.
    pub fn set_consumer_locator(&mut self, locator: Option<KeyLocator>) {
        self.on_changed();
        self.consumer_locator = locator;
    }

    /// Returns the validity period, or `None` if one was never set.
    #[must_use]
    pub const fn validity_period(&self) -> Option<&ValidityPeriod> {
        self.signature.validity_period()
    }

    /// Returns the activation time, or the unbounded start if no validity
    /// period has been set.
    #[must_use]
    pub fn activation_time(&self) -> DateTime<Utc> {
        self.validity_period()
            .map_or_else(unbounded_start, ValidityPeriod::not_before)
    }

    /// Returns the expiration time, or the unbounded end if no validity
    /// period has been set.
    #[must_use]
    pub fn expiration_time(&self) -> DateTime<Utc> {
        self.validity_period()
            .map_or_else(unbounded_end, ValidityPeriod::not_after)
    }

    /// Sets the activation time.
    ///
    /// Creates an unbounded validity period first if none exists. An
    /// expiration time earlier than `time` is moved to `time`.
    pub fn set_activation_time(&mut self, time: DateTime<Utc>) {
        self.on_changed();
        self.signature
            .validity_period_mut()
            .get_or_insert_with(ValidityPeriod::unbounded)
            .set_not_before(time);
    }

    /// Sets the expiration time.
    ///
    /// Creates an unbounded validity period first if none exists. An
    /// activation time later than `time` is moved to `time`.
    pub fn set_expiration_time(&mut self, time: DateTime<Utc>) {
        self.on_changed();
        self.signature
            .validity_period_mut()
            .get_or_insert_with(ValidityPeriod::unbounded)
            .set_not_after(time);
    }

    /// Returns true if the current time is outside the validity period.
    ///
    /// A tag without a validity period never expires.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if `now` is before activation or after expiration.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.validity_period()
            .is_some_and(|period| !period.contains(now))
    }

    /// Returns the key locator of the signing authority, if any.
    #[must_use]
    pub const fn key_locator(&self) -> Option<&KeyLocator> {
        self.signature.key_locator()
    }

    /// Sets the key locator of the signing authority.
    pub fn set_key_locator(&mut self, locator: KeyLocator) {
        self.on_changed();
        self.signature.set_key_locator(Some(locator));
    }

    /// Sets the key locator, returning the tag.
    #[must_use]
    pub fn with_key_locator(mut self, locator: KeyLocator) -> Self {
        self.set_key_locator(locator);
        self
    }

    /// Returns the signature envelope.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Replaces the signature envelope.
    pub fn set_signature(&mut self, signature: Signature) {
        self.on_changed();
        self.signature = signature;
    }

    /// Replaces only the signature value.
    pub fn set_signature_value(&mut self, value: impl Into<Vec<u8>>) {
        self.on_changed();
        self.signature.set_value(value);
    }

    /// Replaces the signature value, returning the tag.
    #[must_use]
    pub fn with_signature_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.set_signature_value(value);
        self
    }
}

impl PartialEq for AuthTag {
    fn eq(&self, other: &Self) -> bool {
        self.wire_encode() == other.wire_encode()
    }
}

impl Eq for AuthTag {}

impl Hash for AuthTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.wire_encode().hash(state);
    }
}

impl fmt::Display for AuthTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthTag({} level={}", self.prefix, self.access_level)?;
        if let Some(locator) = self.key_locator() {
            write!(f, " key={locator}")?;
        }
        write!(f, ")")
    }
}
