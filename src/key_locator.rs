//! Key locators identifying a signing key.

use std::fmt;

use crate::constants::tlv_type;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::name::Name;
use crate::tlv::{TlvEncoder, TlvReader};

/// Identifies the key that produced a signature.
///
/// # Examples
///
/// ```
/// use ndntac::{KeyLocator, Name};
///
/// let by_name = KeyLocator::Name(Name::parse("/hospital/KEY/1").unwrap());
/// let by_digest = KeyLocator::KeyDigest(vec![0xab; 32]);
///
/// assert_ne!(by_name, by_digest);
/// assert_eq!(by_name.to_string(), "/hospital/KEY/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyLocator {
    /// The key is named
    Name(Name),
    /// The key is identified by a digest of its bits
    KeyDigest(Vec<u8>),
}

impl KeyLocator {
    /// Returns the key name, if this locator names the key.
    #[must_use]
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Name(name) => Some(name),
            Self::KeyDigest(_) => None,
        }
    }

    pub(crate) fn encode_into(&self, encoder: &mut TlvEncoder, tlv: u64) {
        encoder.write_nested(tlv, |inner| match self {
            Self::Name(name) => name.encode_into(inner),
            Self::KeyDigest(digest) => inner.write_tlv(tlv_type::KEY_DIGEST, digest),
        });
    }

    pub(crate) fn decode_value(value: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = TlvReader::new(value, "KeyLocator");
        let element = reader.read_element()?;
        let locator = match element.tlv_type {
            tlv_type::NAME => Self::Name(Name::decode_value(element.value)?),
            tlv_type::KEY_DIGEST => Self::KeyDigest(element.value.to_vec()),
            other => {
                return Err(DecodeError::new(
                    "KeyLocator",
                    DecodeErrorKind::UnknownElement { tlv_type: other },
                ));
            }
        };
        reader.finish()?;
        Ok(locator)
    }
}

impl From<Name> for KeyLocator {
    fn from(name: Name) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for KeyLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::KeyDigest(digest) => {
                write!(f, "digest:")?;
                for byte in digest {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(locator: &KeyLocator) -> KeyLocator {
        let mut encoder = TlvEncoder::new();
        locator.encode_into(&mut encoder, tlv_type::KEY_LOCATOR);
        let bytes = encoder.into_bytes();
        let mut reader = TlvReader::new(&bytes, "test");
        let value = reader.expect_element(tlv_type::KEY_LOCATOR).unwrap();
        KeyLocator::decode_value(value).unwrap()
    }

    #[test]
    fn named_locator_round_trips() {
        let locator = KeyLocator::from(Name::parse("/org/KEY/7").unwrap());
        assert_eq!(round_trip(&locator), locator);
        assert!(locator.name().is_some());
    }

    #[test]
    fn digest_locator_round_trips() {
        let locator = KeyLocator::KeyDigest(vec![1, 2, 3]);
        assert_eq!(round_trip(&locator), locator);
        assert!(locator.name().is_none());
        assert_eq!(locator.to_string(), "digest:010203");
    }

    #[test]
    fn unknown_inner_type_fails() {
        let err = KeyLocator::decode_value(&[99, 0]).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnknownElement { tlv_type: 99 });
    }

    #[test]
    fn empty_locator_fails() {
        let err = KeyLocator::decode_value(&[]).unwrap_err();
        assert!(err.is_truncated());
    }
}
