//! Error types for name parsing and wire decoding.

use std::fmt;

/// Errors that can occur when decoding a TLV wire form.
///
/// This is the structured "malformed token" failure: decoding never panics on
/// hostile input, it reports which element was being read and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// The element being decoded when the failure occurred
    pub element: &'static str,
    /// The specific failure
    pub kind: DecodeErrorKind,
}

/// Specific decoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Input ended before the element was complete
    Truncated {
        /// Bytes needed to continue
        needed: usize,
        /// Bytes remaining in the input
        available: usize,
    },
    /// A TLV element had an unexpected type number
    UnexpectedType {
        /// The expected type number
        expected: u64,
        /// The type number found
        found: u64,
    },
    /// A required sub-element is absent
    MissingElement {
        /// Name of the missing sub-element
        name: &'static str,
    },
    /// A sub-element type that is not part of the schema
    UnknownElement {
        /// The unrecognized type number
        tlv_type: u64,
    },
    /// A sub-element that may appear once appeared twice
    DuplicateElement {
        /// Type number of the duplicated sub-element
        tlv_type: u64,
    },
    /// A non-negative integer had a length other than 1, 2, 4 or 8
    InvalidInteger {
        /// The encoded length
        length: usize,
    },
    /// An integer does not fit the field it encodes
    IntegerOutOfRange {
        /// The decoded value
        value: u64,
        /// The maximum allowed value
        max: u64,
    },
    /// A timestamp could not be represented
    InvalidTimestamp {
        /// The encoded milliseconds since the Unix epoch
        millis: u64,
    },
    /// A validity period whose start is after its end
    InvalidValidityPeriod,
    /// A name component was empty
    EmptyNameComponent {
        /// Index of the component
        index: usize,
    },
    /// Bytes remained after the outermost element
    TrailingBytes {
        /// Number of leftover bytes
        count: usize,
    },
}

impl DecodeError {
    /// Creates a decode error for the given element.
    #[must_use]
    pub const fn new(element: &'static str, kind: DecodeErrorKind) -> Self {
        Self { element, kind }
    }

    /// Creates a `MissingElement` error.
    #[must_use]
    pub const fn missing(element: &'static str, name: &'static str) -> Self {
        Self::new(element, DecodeErrorKind::MissingElement { name })
    }

    /// Returns true if the input ended early.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::Truncated { .. })
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed {}: ", self.element)?;
        match &self.kind {
            DecodeErrorKind::Truncated { needed, available } => {
                write!(f, "input truncated; needed {needed} bytes, {available} available")
            }
            DecodeErrorKind::UnexpectedType { expected, found } => {
                write!(f, "expected TLV type {expected}, found {found}")
            }
            DecodeErrorKind::MissingElement { name } => {
                write!(f, "missing required element '{name}'")
            }
            DecodeErrorKind::UnknownElement { tlv_type } => {
                write!(f, "unknown TLV type {tlv_type}")
            }
            DecodeErrorKind::DuplicateElement { tlv_type } => {
                write!(f, "TLV type {tlv_type} appears more than once")
            }
            DecodeErrorKind::InvalidInteger { length } => {
                write!(f, "non-negative integer has invalid length {length}; expected 1, 2, 4 or 8")
            }
            DecodeErrorKind::IntegerOutOfRange { value, max } => {
                write!(f, "integer {value} exceeds maximum {max}")
            }
            DecodeErrorKind::InvalidTimestamp { millis } => {
                write!(f, "timestamp {millis}ms is out of range")
            }
            DecodeErrorKind::InvalidValidityPeriod => {
                write!(f, "validity period starts after it ends")
            }
            DecodeErrorKind::EmptyNameComponent { index } => {
                write!(f, "name component at index {index} is empty")
            }
            DecodeErrorKind::TrailingBytes { count } => {
                write!(f, "{count} unexpected bytes after the element")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors for name URI parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The URI does not start with '/'
    MissingLeadingSlash,
    /// A component between two slashes is empty
    EmptyComponent {
        /// Index of the component
        index: usize,
    },
    /// Too many components
    TooManyComponents {
        /// Maximum allowed components
        max: usize,
        /// Actual component count
        actual: usize,
    },
    /// A percent escape is not two hex digits
    InvalidPercentEncoding {
        /// The component containing the escape
        component: String,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash => write!(f, "name URI must start with '/'"),
            Self::EmptyComponent { index } => {
                write!(f, "name component at index {index} is empty")
            }
            Self::TooManyComponents { max, actual } => {
                write!(f, "name has {actual} components, maximum is {max}")
            }
            Self::InvalidPercentEncoding { component } => {
                write!(f, "invalid percent encoding in component '{component}'")
            }
        }
    }
}

impl std::error::Error for NameError {}

/// Errors for validity period construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityPeriodError {
    /// The start is after the end
    Inverted {
        /// The requested start, RFC 3339
        not_before: String,
        /// The requested end, RFC 3339
        not_after: String,
    },
}

impl fmt::Display for ValidityPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted {
                not_before,
                not_after,
            } => {
                write!(
                    f,
                    "validity period starts at {not_before} but ends earlier at {not_after}"
                )
            }
        }
    }
}

impl std::error::Error for ValidityPeriodError {}
