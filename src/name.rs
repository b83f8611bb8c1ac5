//! Hierarchical content names.

use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_NAME_COMPONENTS, tlv_type};
use crate::error::{DecodeError, DecodeErrorKind, NameError};
use crate::tlv::{TlvEncoder, TlvReader};

/// A hierarchical name made of binary components.
///
/// Names are written in URI form as `/a/b/c`. The empty name `/` is a prefix
/// of every name. Bytes outside the unreserved set (`A-Z a-z 0-9 - . _ ~`)
/// are percent-encoded in URI form.
///
/// # Examples
///
/// ```
/// use ndntac::Name;
///
/// let prefix = Name::parse("/hospital/records").unwrap();
/// let name = Name::parse("/hospital/records/patient-17/v3").unwrap();
///
/// assert!(prefix.is_prefix_of(&name));
/// assert!(!name.is_prefix_of(&prefix));
/// assert_eq!(name.len(), 4);
/// assert_eq!(name.to_string(), "/hospital/records/patient-17/v3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    components: Vec<Vec<u8>>,
}

impl Name {
    /// Creates the empty name `/`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a name from its URI form.
    ///
    /// A single trailing slash is accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns `NameError` if:
    /// - The input does not start with '/'
    /// - A component is empty
    /// - A percent escape is malformed
    /// - There are more than 64 components
    pub fn parse(input: &str) -> Result<Self, NameError> {
        let rest = input
            .strip_prefix('/')
            .ok_or(NameError::MissingLeadingSlash)?;
        if rest.is_empty() {
            return Ok(Self::new());
        }
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let pieces: Vec<&str> = rest.split('/').collect();
        if pieces.len() > MAX_NAME_COMPONENTS {
            return Err(NameError::TooManyComponents {
                max: MAX_NAME_COMPONENTS,
                actual: pieces.len(),
            });
        }

        let mut components = Vec::with_capacity(pieces.len());
        for (index, piece) in pieces.iter().enumerate() {
            if piece.is_empty() {
                return Err(NameError::EmptyComponent { index });
            }
            components.push(percent_decode(piece)?);
        }

        Ok(Self { components })
    }

    /// Appends a component, returning the extended name.
    ///
    /// # Errors
    ///
    /// Returns `NameError` if the component is empty or the name already
    /// has 64 components.
    pub fn with_component(mut self, component: impl Into<Vec<u8>>) -> Result<Self, NameError> {
        let component = component.into();
        if component.is_empty() {
            return Err(NameError::EmptyComponent {
                index: self.components.len(),
            });
        }
        if self.components.len() >= MAX_NAME_COMPONENTS {
            return Err(NameError::TooManyComponents {
                max: MAX_NAME_COMPONENTS,
                actual: self.components.len() + 1,
            });
        }
        self.components.push(component);
        Ok(self)
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true for the empty name `/`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the component at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.components.get(index).map(Vec::as_slice)
    }

    /// Iterates over the components.
    pub fn components(&self) -> impl Iterator<Item = &[u8]> {
        self.components.iter().map(Vec::as_slice)
    }

    /// Returns true if this name is a component-wise prefix of `other`.
    ///
    /// Every name is a prefix of itself.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    pub(crate) fn encode_into(&self, encoder: &mut TlvEncoder) {
        encoder.write_nested(tlv_type::NAME, |inner| {
            for component in &self.components {
                inner.write_tlv(tlv_type::NAME_COMPONENT, component);
            }
        });
    }

    pub(crate) fn decode_value(value: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = TlvReader::new(value, "Name");
        let mut components = Vec::new();
        while !reader.is_empty() {
            let component = reader.expect_element(tlv_type::NAME_COMPONENT)?;
            if component.is_empty() {
                return Err(DecodeError::new(
                    "Name",
                    DecodeErrorKind::EmptyNameComponent {
                        index: components.len(),
                    },
                ));
            }
            components.push(component.to_vec());
        }
        Ok(Self { components })
    }

    /// Encodes the name as a standalone TLV element.
    #[must_use]
    pub fn wire_encode(&self) -> Vec<u8> {
        let mut encoder = TlvEncoder::new();
        self.encode_into(&mut encoder);
        encoder.into_bytes()
    }

    /// Decodes a standalone name element.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the input is not exactly one valid name element.
    pub fn wire_decode(wire: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = TlvReader::new(wire, "Name");
        let value = reader.expect_element(tlv_type::NAME)?;
        reader.finish()?;
        Self::decode_value(value)
    }
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

fn percent_decode(piece: &str) -> Result<Vec<u8>, NameError> {
    let invalid = || NameError::InvalidPercentEncoding {
        component: piece.to_string(),
    };
    let bytes = piece.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = piece.get(i + 1..i + 3).ok_or_else(invalid)?;
            let byte = u8::from_str_radix(hex, 16).map_err(|_| invalid())?;
            decoded.push(byte);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    Ok(decoded)
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/")?;
            for &byte in component {
                if is_unreserved(byte) {
                    write!(f, "{}", byte as char)?;
                } else {
                    write!(f, "%{byte:02X}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root() {
        let name = Name::parse("/").unwrap();
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "/");
    }

    #[test]
    fn parse_components() {
        let name = Name::parse("/a/bc/d").unwrap();
        assert_eq!(name.len(), 3);
        assert_eq!(name.get(1), Some(&b"bc"[..]));
        assert_eq!(name.get(3), None);
    }

    #[test]
    fn trailing_slash_ignored() {
        assert_eq!(Name::parse("/a/b/").unwrap(), Name::parse("/a/b").unwrap());
    }

    #[test]
    fn missing_leading_slash_fails() {
        assert_eq!(Name::parse("a/b"), Err(NameError::MissingLeadingSlash));
    }

    #[test]
    fn empty_component_fails() {
        assert_eq!(
            Name::parse("/a//b"),
            Err(NameError::EmptyComponent { index: 1 })
        );
        assert_eq!(Name::parse("//"), Err(NameError::EmptyComponent { index: 0 }));
    }

    #[test]
    fn too_many_components_fails() {
        let uri = "/x".repeat(65);
        assert!(matches!(
            Name::parse(&uri),
            Err(NameError::TooManyComponents { max: 64, actual: 65 })
        ));
    }

    #[test]
    fn percent_encoding_round_trips() {
        let name = Name::new().with_component(vec![0x00, b'a', 0xFF]).unwrap();
        let uri = name.to_string();
        assert_eq!(uri, "/%00a%FF");
        assert_eq!(Name::parse(&uri).unwrap(), name);
    }

    #[test]
    fn bad_percent_escape_fails() {
        assert!(matches!(
            Name::parse("/a%G1"),
            Err(NameError::InvalidPercentEncoding { .. })
        ));
        assert!(matches!(
            Name::parse("/a%4"),
            Err(NameError::InvalidPercentEncoding { .. })
        ));
    }

    #[test]
    fn prefix_relationships() {
        let root = Name::new();
        let a = Name::parse("/a").unwrap();
        let ab = Name::parse("/a/b").unwrap();
        let ac = Name::parse("/a/c").unwrap();

        assert!(root.is_prefix_of(&ab));
        assert!(a.is_prefix_of(&ab));
        assert!(ab.is_prefix_of(&ab));
        assert!(!ab.is_prefix_of(&a));
        assert!(!ac.is_prefix_of(&ab));
    }

    #[test]
    fn partial_component_is_not_a_prefix() {
        let short = Name::parse("/rec").unwrap();
        let long = Name::parse("/records").unwrap();
        assert!(!short.is_prefix_of(&long));
    }

    #[test]
    fn wire_round_trip() {
        let name = Name::parse("/video/clip/segment-4").unwrap();
        let wire = name.wire_encode();
        assert_eq!(wire[0], 7);
        assert_eq!(Name::wire_decode(&wire).unwrap(), name);
    }

    #[test]
    fn wire_rejects_empty_component() {
        let wire = [7, 2, 8, 0];
        let err = Name::wire_decode(&wire).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::EmptyNameComponent { index: 0 });
    }

    #[test]
    fn with_component_rejects_empty() {
        let err = Name::new().with_component(Vec::new()).unwrap_err();
        assert_eq!(err, NameError::EmptyComponent { index: 0 });

        let err = Name::parse("/a")
            .unwrap()
            .with_component(&b""[..])
            .unwrap_err();
        assert_eq!(err, NameError::EmptyComponent { index: 1 });
    }

    #[test]
    fn with_component_keeps_wire_decodable() {
        let name = Name::new()
            .with_component(&b"a b"[..])
            .and_then(|name| name.with_component(vec![0, 1]))
            .unwrap();
        assert_eq!(Name::wire_decode(&name.wire_encode()).unwrap(), name);
        assert_eq!(name.to_string(), "/a%20b/%00%01");
    }

    #[test]
    fn with_component_respects_limit() {
        let full = (0..MAX_NAME_COMPONENTS)
            .try_fold(Name::new(), |name, _| name.with_component(&b"x"[..]))
            .unwrap();
        assert_eq!(
            full.with_component(&b"x"[..]),
            Err(NameError::TooManyComponents { max: 64, actual: 65 })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_uri_form() {
        let name = Name::parse("/video/clip").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"/video/clip\"");
        assert_eq!(serde_json::from_str::<Name>(&json).unwrap(), name);
        assert!(serde_json::from_str::<Name>("\"no-slash\"").is_err());
    }
}
