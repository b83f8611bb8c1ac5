//! Named content objects.

use std::fmt;
use std::time::Duration;

use crate::constants::tlv_type;
use crate::error::{DecodeError, DecodeErrorKind};
use crate::name::Name;
use crate::signature::Signature;
use crate::tlv::{TlvEncoder, TlvReader, decode_nonneg, set_once};

const ELEMENT: &str = "Data";

/// The kind of payload a data packet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    /// Ordinary content
    #[default]
    Blob,
    /// A link to other names
    Link,
    /// A public key
    Key,
    /// Negative acknowledgement from a producer
    Nack,
    /// A refusal standing in for content the requester may not read
    AuthDenial,
    /// Confirmation that a tag was accepted upstream
    AuthGranted,
    /// End of a content sequence
    EndOfContent,
    /// Any other code
    Other(u64),
}

impl ContentType {
    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> u64 {
        match self {
            Self::Blob => 0,
            Self::Link => 1,
            Self::Key => 2,
            Self::Nack => 3,
            Self::AuthDenial => 100,
            Self::AuthGranted => 101,
            Self::EndOfContent => 102,
            Self::Other(code) => code,
        }
    }

    /// Maps a wire code to a content type.
    #[must_use]
    pub const fn from_code(code: u64) -> Self {
        match code {
            0 => Self::Blob,
            1 => Self::Link,
            2 => Self::Key,
            3 => Self::Nack,
            100 => Self::AuthDenial,
            101 => Self::AuthGranted,
            102 => Self::EndOfContent,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob => write!(f, "Blob"),
            Self::Link => write!(f, "Link"),
            Self::Key => write!(f, "Key"),
            Self::Nack => write!(f, "Nack"),
            Self::AuthDenial => write!(f, "AuthDenial"),
            Self::AuthGranted => write!(f, "AuthGranted"),
            Self::EndOfContent => write!(f, "EoC"),
            Self::Other(code) => write!(f, "ContentType({code})"),
        }
    }
}

/// A named content object with a required access level.
///
/// Freshness is kept at millisecond precision, matching the wire form.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ndntac::{ContentType, Data, Name};
///
/// let data = Data::new(Name::parse("/news/today").unwrap())
///     .with_content(b"headline".to_vec())
///     .with_access_level(2)
///     .with_freshness_period(Duration::from_secs(10));
///
/// assert_eq!(data.content_type(), ContentType::Blob);
/// assert_eq!(Data::wire_decode(&data.wire_encode()).unwrap(), data);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    content_type: ContentType,
    freshness_period: Duration,
    access_level: u8,
    no_recache: bool,
    content: Vec<u8>,
    signature: Signature,
}

impl Data {
    /// Creates an empty public blob with the given name.
    #[must_use]
    pub fn new(name: Name) -> Self {
        Self {
            name,
            content_type: ContentType::Blob,
            freshness_period: Duration::ZERO,
            access_level: 0,
            no_recache: false,
            content: Vec::new(),
            signature: Signature::new(),
        }
    }

    /// Sets the content type.
    #[must_use]
    pub const fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the required access level.
    #[must_use]
    pub const fn with_access_level(mut self, access_level: u8) -> Self {
        self.access_level = access_level;
        self
    }

    /// Sets the freshness period.
    #[must_use]
    pub fn with_freshness_period(mut self, period: Duration) -> Self {
        self.set_freshness_period(period);
        self
    }

    /// Sets the signature.
    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the content type.
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: ContentType) {
        self.content_type = content_type;
    }

    /// Returns the payload.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Replaces the payload.
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
    }

    /// Returns the freshness period.
    #[must_use]
    pub const fn freshness_period(&self) -> Duration {
        self.freshness_period
    }

    /// Sets the freshness period, truncated to whole milliseconds.
    pub fn set_freshness_period(&mut self, period: Duration) {
        self.freshness_period = Duration::from_millis(duration_millis(period));
    }

    /// Returns the access level required to read this content; 0 is public.
    #[must_use]
    pub const fn access_level(&self) -> u8 {
        self.access_level
    }

    /// Sets the required access level.
    pub fn set_access_level(&mut self, access_level: u8) {
        self.access_level = access_level;
    }

    /// Returns true if downstream nodes must not re-cache this packet.
    #[must_use]
    pub const fn no_recache(&self) -> bool {
        self.no_recache
    }

    /// Sets the no-recache flag.
    pub fn set_no_recache_flag(&mut self, no_recache: bool) {
        self.no_recache = no_recache;
    }

    /// Returns the signature.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Replaces the signature.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
    }

    /// Encodes the packet.
    #[must_use]
    pub fn wire_encode(&self) -> Vec<u8> {
        let mut encoder = TlvEncoder::new();
        encoder.write_nested(tlv_type::DATA, |inner| {
            self.name.encode_into(inner);
            inner.write_nested(tlv_type::META_INFO, |meta| {
                meta.write_nonneg(tlv_type::CONTENT_TYPE, self.content_type.code());
                meta.write_nonneg(
                    tlv_type::FRESHNESS_PERIOD,
                    duration_millis(self.freshness_period),
                );
                meta.write_nonneg(tlv_type::ACCESS_LEVEL, u64::from(self.access_level));
                if self.no_recache {
                    meta.write_tlv(tlv_type::NO_RECACHE, &[]);
                }
            });
            inner.write_tlv(tlv_type::CONTENT, &self.content);
            self.signature.encode_into(inner);
        });
        encoder.into_bytes()
    }

    /// Decodes a packet.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the input is not exactly one well-formed packet.
    pub fn wire_decode(wire: &[u8]) -> Result<Self, DecodeError> {
        let mut outer = TlvReader::new(wire, ELEMENT);
        let body = outer.expect_element(tlv_type::DATA)?;
        outer.finish()?;

        let mut reader = TlvReader::new(body, ELEMENT);
        let name = Name::decode_value(reader.expect_element(tlv_type::NAME)?)?;
        let meta = reader.expect_element(tlv_type::META_INFO)?;
        let content = reader.expect_element(tlv_type::CONTENT)?.to_vec();
        let info = reader.expect_element(tlv_type::SIGNATURE_INFO)?;
        let value = reader.expect_element(tlv_type::SIGNATURE_VALUE)?;
        reader.finish()?;

        let mut data = Self::new(name);
        data.content = content;
        data.signature = Signature::decode_parts(info, value)?;
        data.decode_meta(meta)?;
        Ok(data)
    }

    fn decode_meta(&mut self, meta: &[u8]) -> Result<(), DecodeError> {
        const META: &str = "MetaInfo";
        let mut reader = TlvReader::new(meta, META);
        let mut content_type = None;
        let mut freshness = None;
        let mut access_level = None;
        let mut no_recache = None;

        while !reader.is_empty() {
            let element = reader.read_element()?;
            match element.tlv_type {
                tlv_type::CONTENT_TYPE => set_once(
                    &mut content_type,
                    ContentType::from_code(decode_nonneg(element.value, META)?),
                    element.tlv_type,
                    META,
                )?,
                tlv_type::FRESHNESS_PERIOD => set_once(
                    &mut freshness,
                    Duration::from_millis(decode_nonneg(element.value, META)?),
                    element.tlv_type,
                    META,
                )?,
                tlv_type::ACCESS_LEVEL => {
                    let level = decode_nonneg(element.value, META)?;
                    let level = u8::try_from(level).map_err(|_| {
                        DecodeError::new(
                            META,
                            DecodeErrorKind::IntegerOutOfRange {
                                value: level,
                                max: u64::from(u8::MAX),
                            },
                        )
                    })?;
                    set_once(&mut access_level, level, element.tlv_type, META)?;
                }
                tlv_type::NO_RECACHE => set_once(&mut no_recache, true, element.tlv_type, META)?,
                other => {
                    return Err(DecodeError::new(
                        META,
                        DecodeErrorKind::UnknownElement { tlv_type: other },
                    ));
                }
            }
        }

        self.content_type = content_type.unwrap_or_default();
        self.freshness_period = freshness.unwrap_or_default();
        self.access_level = access_level.unwrap_or(0);
        self.no_recache = no_recache.unwrap_or(false);
        Ok(())
    }
}

fn duration_millis(period: Duration) -> u64 {
    u64::try_from(period.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_locator::KeyLocator;

    fn sample() -> Data {
        Data::new(Name::parse("/lab/results/42").unwrap())
            .with_content(vec![1, 2, 3, 4])
            .with_access_level(3)
            .with_freshness_period(Duration::from_millis(1500))
            .with_signature(
                Signature::new()
                    .with_key_locator(KeyLocator::Name(Name::parse("/lab/KEY").unwrap()))
                    .with_value(vec![8; 8]),
            )
    }

    #[test]
    fn content_type_codes_round_trip() {
        for content_type in [
            ContentType::Blob,
            ContentType::Link,
            ContentType::Key,
            ContentType::Nack,
            ContentType::AuthDenial,
            ContentType::AuthGranted,
            ContentType::EndOfContent,
            ContentType::Other(77),
        ] {
            assert_eq!(ContentType::from_code(content_type.code()), content_type);
        }
    }

    #[test]
    fn wire_round_trip() {
        let mut data = sample();
        data.set_no_recache_flag(true);
        let decoded = Data::wire_decode(&data.wire_encode()).unwrap();
        assert_eq!(decoded, data);
        assert!(decoded.no_recache());
        assert_eq!(decoded.access_level(), 3);
    }

    #[test]
    fn freshness_truncated_to_millis() {
        let data = Data::new(Name::new()).with_freshness_period(Duration::from_micros(2500));
        assert_eq!(data.freshness_period(), Duration::from_millis(2));
    }

    #[test]
    fn unknown_meta_element_fails() {
        let mut encoder = TlvEncoder::new();
        encoder.write_nested(tlv_type::DATA, |inner| {
            Name::new().encode_into(inner);
            inner.write_nested(tlv_type::META_INFO, |meta| meta.write_tlv(99, &[]));
            inner.write_tlv(tlv_type::CONTENT, &[]);
            Signature::new().encode_into(inner);
        });
        let err = Data::wire_decode(&encoder.into_bytes()).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnknownElement { tlv_type: 99 });
    }

    #[test]
    fn truncated_packet_fails() {
        let wire = sample().wire_encode();
        let err = Data::wire_decode(&wire[..wire.len() - 1]).unwrap_err();
        assert!(err.is_truncated());
    }
}
