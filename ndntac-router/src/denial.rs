//! Denial responses standing in for refused content.

use std::time::Duration;

use ndntac::{ContentType, Data, DecodeError, DecodeErrorKind, Signature};

/// Builds the denial sent in place of `data`.
///
/// The denial keeps the name, is typed [`ContentType::AuthDenial`], carries
/// the full wire encoding of `data` as its payload, is never fresh, and
/// bears a placeholder signature. A consumer that later obtains a valid tag
/// can unwrap the original with [`recover_denied_content`].
///
/// # Examples
///
/// ```
/// use ndntac::{ContentType, Data, Name};
/// use ndntac_router::{make_auth_denial, recover_denied_content};
///
/// let data = Data::new(Name::parse("/lab/secret").unwrap()).with_access_level(4);
/// let denial = make_auth_denial(&data);
///
/// assert_eq!(denial.name(), data.name());
/// assert_eq!(denial.content_type(), ContentType::AuthDenial);
/// assert_eq!(recover_denied_content(&denial).unwrap(), data);
/// ```
#[must_use]
pub fn make_auth_denial(data: &Data) -> Data {
    Data::new(data.name().clone())
        .with_content_type(ContentType::AuthDenial)
        .with_content(data.wire_encode())
        .with_freshness_period(Duration::ZERO)
        .with_signature(Signature::placeholder())
}

/// Extracts the original content from a denial.
///
/// # Errors
///
/// Returns `DecodeError` if `denial` is not an `AuthDenial` or its payload
/// is not a well-formed data packet.
pub fn recover_denied_content(denial: &Data) -> Result<Data, DecodeError> {
    if denial.content_type() != ContentType::AuthDenial {
        return Err(DecodeError::new(
            "AuthDenial",
            DecodeErrorKind::UnexpectedType {
                expected: ContentType::AuthDenial.code(),
                found: denial.content_type().code(),
            },
        ));
    }
    Data::wire_decode(denial.content())
}
