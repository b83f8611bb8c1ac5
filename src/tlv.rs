//! Type-length-value encoding primitives.
//!
//! Every element is `TYPE LENGTH VALUE`, where TYPE and LENGTH use the
//! variable-size number format:
//!
//! ```text
//! n < 253          -> 1 byte
//! n <= 0xFFFF      -> 0xFD + 2 bytes big-endian
//! n <= 0xFFFF_FFFF -> 0xFE + 4 bytes big-endian
//! otherwise        -> 0xFF + 8 bytes big-endian
//! ```
//!
//! Non-negative integer values use the shortest of 1, 2, 4 or 8 bytes.

use crate::error::{DecodeError, DecodeErrorKind};

/// Builds a TLV byte buffer.
#[derive(Debug, Default)]
pub struct TlvEncoder {
    buf: Vec<u8>,
}

impl TlvEncoder {
    /// Creates an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a variable-size number.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_var_number(&mut self, n: u64) {
        match n {
            0..=252 => self.buf.push(n as u8),
            253..=0xFFFF => {
                self.buf.push(0xFD);
                self.buf.extend_from_slice(&(n as u16).to_be_bytes());
            }
            0x1_0000..=0xFFFF_FFFF => {
                self.buf.push(0xFE);
                self.buf.extend_from_slice(&(n as u32).to_be_bytes());
            }
            _ => {
                self.buf.push(0xFF);
                self.buf.extend_from_slice(&n.to_be_bytes());
            }
        }
    }

    /// Appends a complete element.
    pub fn write_tlv(&mut self, tlv_type: u64, value: &[u8]) {
        self.write_var_number(tlv_type);
        self.write_var_number(value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    /// Appends an element holding a non-negative integer.
    pub fn write_nonneg(&mut self, tlv_type: u64, value: u64) {
        let bytes = value.to_be_bytes();
        let value_bytes: &[u8] = match value {
            0..=0xFF => &bytes[7..],
            0x100..=0xFFFF => &bytes[6..],
            0x1_0000..=0xFFFF_FFFF => &bytes[4..],
            _ => &bytes,
        };
        self.write_tlv(tlv_type, value_bytes);
    }

    /// Appends an element whose value is produced by `inner`.
    pub fn write_nested(&mut self, tlv_type: u64, inner: impl FnOnce(&mut TlvEncoder)) {
        let mut nested = TlvEncoder::new();
        inner(&mut nested);
        self.write_tlv(tlv_type, &nested.buf);
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// A decoded element borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a> {
    /// The type number
    pub tlv_type: u64,
    /// The value bytes
    pub value: &'a [u8],
}

/// Reads TLV elements sequentially from a byte slice.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    input: &'a [u8],
    element: &'static str,
}

impl<'a> TlvReader<'a> {
    /// Creates a reader; `element` names what is being decoded in errors.
    #[must_use]
    pub const fn new(input: &'a [u8], element: &'static str) -> Self {
        Self { input, element }
    }

    /// Returns true when all input has been consumed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn error(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(self.element, kind)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.input.len() < n {
            return Err(self.error(DecodeErrorKind::Truncated {
                needed: n,
                available: self.input.len(),
            }));
        }
        let (head, tail) = self.input.split_at(n);
        self.input = tail;
        Ok(head)
    }

    /// Reads a variable-size number.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the input ends inside the number.
    pub fn read_var_number(&mut self) -> Result<u64, DecodeError> {
        let first = self.take(1)?[0];
        let width = match first {
            0xFD => 2,
            0xFE => 4,
            0xFF => 8,
            n => return Ok(u64::from(n)),
        };
        Ok(be_to_u64(self.take(width)?))
    }

    /// Reads the next element.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the element header or value is truncated.
    pub fn read_element(&mut self) -> Result<Element<'a>, DecodeError> {
        let tlv_type = self.read_var_number()?;
        let length = self.read_var_number()?;
        let length = usize::try_from(length).map_err(|_| {
            self.error(DecodeErrorKind::Truncated {
                needed: usize::MAX,
                available: self.input.len(),
            })
        })?;
        let value = self.take(length)?;
        Ok(Element { tlv_type, value })
    }

    /// Reads the next element and checks its type.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the element is truncated or has another type.
    pub fn expect_element(&mut self, tlv_type: u64) -> Result<&'a [u8], DecodeError> {
        let element = self.read_element()?;
        if element.tlv_type != tlv_type {
            return Err(self.error(DecodeErrorKind::UnexpectedType {
                expected: tlv_type,
                found: element.tlv_type,
            }));
        }
        Ok(element.value)
    }

    /// Returns the type number of the next element without consuming it.
    #[must_use]
    pub fn peek_type(&self) -> Option<u64> {
        let mut probe = self.clone();
        probe.read_var_number().ok()
    }

    /// Fails if any input remains.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` with `TrailingBytes` when input remains.
    pub fn finish(&self) -> Result<(), DecodeError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(self.error(DecodeErrorKind::TrailingBytes {
                count: self.input.len(),
            }))
        }
    }
}

fn be_to_u64(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
}

/// Decodes the value of a non-negative integer element.
///
/// # Errors
///
/// Returns `DecodeError` if the value length is not 1, 2, 4 or 8.
pub fn decode_nonneg(value: &[u8], element: &'static str) -> Result<u64, DecodeError> {
    match value.len() {
        1 | 2 | 4 | 8 => Ok(be_to_u64(value)),
        length => Err(DecodeError::new(
            element,
            DecodeErrorKind::InvalidInteger { length },
        )),
    }
}

/// Stores `element` into `slot`, failing if the slot is already filled.
///
/// # Errors
///
/// Returns `DecodeError` with `DuplicateElement` on a second occurrence.
pub fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    tlv_type: u64,
    element: &'static str,
) -> Result<(), DecodeError> {
    if slot.is_some() {
        return Err(DecodeError::new(
            element,
            DecodeErrorKind::DuplicateElement { tlv_type },
        ));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_var(n: u64) -> Vec<u8> {
        let mut enc = TlvEncoder::new();
        enc.write_var_number(n);
        enc.into_bytes()
    }

    #[test]
    fn var_number_widths() {
        assert_eq!(encode_var(0), vec![0]);
        assert_eq!(encode_var(252), vec![252]);
        assert_eq!(encode_var(253), vec![0xFD, 0x00, 0xFD]);
        assert_eq!(encode_var(0x1_0000), vec![0xFE, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(encode_var(u64::MAX).len(), 9);
    }

    #[test]
    fn var_number_reads_back() {
        for n in [0, 1, 252, 253, 0xFFFF, 0x1_0000, 0xFFFF_FFFF, u64::MAX] {
            let bytes = encode_var(n);
            let mut reader = TlvReader::new(&bytes, "test");
            assert_eq!(reader.read_var_number().unwrap(), n);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn nonneg_uses_shortest_width() {
        let mut enc = TlvEncoder::new();
        enc.write_nonneg(1, 5);
        enc.write_nonneg(1, 0x1234);
        enc.write_nonneg(1, 0x1234_5678_9A);
        let bytes = enc.into_bytes();
        let mut reader = TlvReader::new(&bytes, "test");

        let a = reader.expect_element(1).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(decode_nonneg(a, "test").unwrap(), 5);

        let b = reader.expect_element(1).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(decode_nonneg(b, "test").unwrap(), 0x1234);

        let c = reader.expect_element(1).unwrap();
        assert_eq!(c.len(), 8);
        assert_eq!(decode_nonneg(c, "test").unwrap(), 0x1234_5678_9A);
    }

    #[test]
    fn nonneg_rejects_odd_length() {
        let err = decode_nonneg(&[1, 2, 3], "test").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::InvalidInteger { length: 3 });
    }

    #[test]
    fn truncated_value_is_reported() {
        let bytes = [7, 5, 1, 2];
        let mut reader = TlvReader::new(&bytes, "Name");
        let err = reader.read_element().unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(err.element, "Name");
    }

    #[test]
    fn unexpected_type_is_reported() {
        let bytes = [8, 0];
        let mut reader = TlvReader::new(&bytes, "Name");
        let err = reader.expect_element(7).unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::UnexpectedType {
                expected: 7,
                found: 8
            }
        );
    }

    #[test]
    fn nested_and_peek() {
        let mut enc = TlvEncoder::new();
        enc.write_nested(20, |inner| inner.write_nonneg(24, 3));
        let bytes = enc.into_bytes();
        let reader = TlvReader::new(&bytes, "test");
        assert_eq!(reader.peek_type(), Some(20));
        assert_eq!(bytes, vec![20, 3, 24, 1, 3]);
    }

    #[test]
    fn finish_detects_trailing_bytes() {
        let bytes = [1, 0, 9];
        let mut reader = TlvReader::new(&bytes, "test");
        reader.read_element().unwrap();
        assert_eq!(
            reader.finish().unwrap_err().kind,
            DecodeErrorKind::TrailingBytes { count: 1 }
        );
    }

    #[test]
    fn set_once_rejects_duplicates() {
        let mut slot = None;
        set_once(&mut slot, 1, 201, "AuthTag").unwrap();
        let err = set_once(&mut slot, 2, 201, "AuthTag").unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::DuplicateElement { tlv_type: 201 });
    }
}
