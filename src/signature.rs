//! Signature envelopes.

use crate::constants::{INVALID_SIGNATURE_SENTINEL, tlv_type};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::key_locator::KeyLocator;
use crate::tlv::{TlvEncoder, TlvReader, decode_nonneg, set_once};
use crate::validity_period::{ValidityPeriod, decode_period_once};

/// Signature type codes.
pub mod signature_type {
    /// SHA-256 digest, no key.
    pub const DIGEST_SHA256: u64 = 0;
    /// RSA over SHA-256.
    pub const SHA256_WITH_RSA: u64 = 1;
    /// ECDSA over SHA-256.
    pub const SHA256_WITH_ECDSA: u64 = 3;
    /// HMAC over SHA-256.
    pub const HMAC_WITH_SHA256: u64 = 4;
}

/// Value carried by the placeholder signature on synthesized packets.
const PLACEHOLDER_VALUE: &[u8] = b"placeholder-signature";

/// A signature envelope: signature info plus the opaque signature value.
///
/// No cryptography happens here. The value is carried as bytes, and a
/// non-empty value whose first byte is not
/// [`INVALID_SIGNATURE_SENTINEL`](crate::INVALID_SIGNATURE_SENTINEL) stands
/// in for a signature that verifies.
///
/// # Examples
///
/// ```
/// use ndntac::{KeyLocator, Name, Signature};
///
/// let signature = Signature::new()
///     .with_key_locator(KeyLocator::Name(Name::parse("/org/KEY/1").unwrap()))
///     .with_value(vec![0x30, 0x45]);
///
/// assert!(signature.has_key_locator());
/// assert!(signature.carries_valid_marker());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    signature_type: u64,
    key_locator: Option<KeyLocator>,
    validity_period: Option<ValidityPeriod>,
    value: Vec<u8>,
}

impl Default for Signature {
    fn default() -> Self {
        Self::new()
    }
}

impl Signature {
    /// Creates an empty ECDSA signature envelope.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            signature_type: signature_type::SHA256_WITH_ECDSA,
            key_locator: None,
            validity_period: None,
            value: Vec::new(),
        }
    }

    /// Creates the placeholder signature used for packets whose authenticity
    /// is not checked, such as denials.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            signature_type: signature_type::DIGEST_SHA256,
            key_locator: None,
            validity_period: None,
            value: PLACEHOLDER_VALUE.to_vec(),
        }
    }

    /// Sets the signature type.
    #[must_use]
    pub fn with_type(mut self, signature_type: u64) -> Self {
        self.signature_type = signature_type;
        self
    }

    /// Sets the key locator.
    #[must_use]
    pub fn with_key_locator(mut self, key_locator: KeyLocator) -> Self {
        self.key_locator = Some(key_locator);
        self
    }

    /// Sets the validity period.
    #[must_use]
    pub fn with_validity_period(mut self, period: ValidityPeriod) -> Self {
        self.validity_period = Some(period);
        self
    }

    /// Sets the signature value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = value.into();
        self
    }

    /// Returns the signature type code.
    #[must_use]
    pub const fn signature_type(&self) -> u64 {
        self.signature_type
    }

    /// Returns true if the envelope names a signing key.
    #[must_use]
    pub const fn has_key_locator(&self) -> bool {
        self.key_locator.is_some()
    }

    /// Returns the key locator, if any.
    #[must_use]
    pub const fn key_locator(&self) -> Option<&KeyLocator> {
        self.key_locator.as_ref()
    }

    /// Replaces the key locator.
    pub fn set_key_locator(&mut self, key_locator: Option<KeyLocator>) {
        self.key_locator = key_locator;
    }

    /// Returns the validity period, if one has been set.
    #[must_use]
    pub const fn validity_period(&self) -> Option<&ValidityPeriod> {
        self.validity_period.as_ref()
    }

    pub(crate) fn validity_period_mut(&mut self) -> &mut Option<ValidityPeriod> {
        &mut self.validity_period
    }

    /// Returns the signature value bytes.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replaces the signature value.
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) {
        self.value = value.into();
    }

    /// Returns true if the value stands in for a signature that verifies:
    /// non-empty, first byte not the invalid sentinel.
    #[must_use]
    pub fn carries_valid_marker(&self) -> bool {
        self.value
            .first()
            .is_some_and(|first| *first != INVALID_SIGNATURE_SENTINEL)
    }

    /// Appends the `SignatureInfo` and `SignatureValue` elements.
    pub(crate) fn encode_into(&self, encoder: &mut TlvEncoder) {
        encoder.write_nested(tlv_type::SIGNATURE_INFO, |info| {
            info.write_nonneg(tlv_type::SIGNATURE_TYPE, self.signature_type);
            if let Some(locator) = &self.key_locator {
                locator.encode_into(info, tlv_type::KEY_LOCATOR);
            }
            if let Some(period) = &self.validity_period {
                period.encode_into(info);
            }
        });
        encoder.write_tlv(tlv_type::SIGNATURE_VALUE, &self.value);
    }

    /// Rebuilds a signature from the values of its two elements.
    pub(crate) fn decode_parts(info: &[u8], value: &[u8]) -> Result<Self, DecodeError> {
        const ELEMENT: &str = "SignatureInfo";
        let mut reader = TlvReader::new(info, ELEMENT);
        let mut signature_type = None;
        let mut key_locator = None;
        let mut validity_period = None;

        while !reader.is_empty() {
            let element = reader.read_element()?;
            match element.tlv_type {
                tlv_type::SIGNATURE_TYPE => set_once(
                    &mut signature_type,
                    decode_nonneg(element.value, ELEMENT)?,
                    element.tlv_type,
                    ELEMENT,
                )?,
                tlv_type::KEY_LOCATOR => set_once(
                    &mut key_locator,
                    KeyLocator::decode_value(element.value)?,
                    element.tlv_type,
                    ELEMENT,
                )?,
                tlv_type::VALIDITY_PERIOD => {
                    decode_period_once(&mut validity_period, element.value, ELEMENT)?;
                }
                other => {
                    return Err(DecodeError::new(
                        ELEMENT,
                        DecodeErrorKind::UnknownElement { tlv_type: other },
                    ));
                }
            }
        }

        Ok(Self {
            signature_type: signature_type
                .ok_or(DecodeError::missing(ELEMENT, "SignatureType"))?,
            key_locator,
            validity_period,
            value: value.to_vec(),
        })
    }
}
