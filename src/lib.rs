//! Capability tokens and wire codec for tag-based access control on named data.
//!
//! This crate provides the value types a forwarding node needs to decide
//! whether cached content may be released to a requester:
//!
//! - **Names**: [`Name`], hierarchical binary names with URI form
//! - **Tokens**: [`AuthTag`], a signed capability granting an access level
//!   under a name prefix, with a lazily cached wire encoding
//! - **Packets**: [`Data`] carrying a required access level, and
//!   [`Interest`] carrying a tag and a release hint
//! - **Wire codec**: [`TlvEncoder`] and [`TlvReader`] for the
//!   type-length-value format all of the above serialize to
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use ndntac::{AuthTag, Data, Interest, KeyLocator, Name};
//!
//! let mut tag = AuthTag::with_access_level(2)
//!     .with_prefix(Name::parse("/clinic").unwrap())
//!     .with_key_locator(KeyLocator::Name(Name::parse("/clinic/KEY/1").unwrap()))
//!     .with_signature_value(vec![0x5a; 16]);
//! tag.set_expiration_time(Utc::now() + Duration::minutes(30));
//!
//! let data = Data::new(Name::parse("/clinic/charts/17").unwrap()).with_access_level(2);
//! let interest = Interest::new(data.name().clone()).with_auth_tag(tag.clone());
//!
//! assert!(tag.prefix().is_prefix_of(data.name()));
//! assert!(tag.access_level() >= data.access_level());
//! assert_eq!(AuthTag::from_wire(interest.auth_tag().wire_encode()).unwrap(), tag);
//! ```
//!
//! # Tag Wire Format
//!
//! ```text
//! AuthTag(200) { Name, AccessLevel(201), RouteHash(202),
//!                [ConsumerLocator(203)], SignatureInfo(22), SignatureValue(23) }
//! ```
//!
//! Two tags are equal exactly when their encodings are equal.
//!
//! # Time Bounds
//!
//! | Bound | Value when unset |
//! |-------|------------------|
//! | Activation | Unix epoch |
//! | Expiration | 9999-12-31T23:59:59Z |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod auth_tag;
mod constants;
mod data;
mod error;
mod interest;
mod key_locator;
mod name;
pub mod prelude;
mod signature;
mod tlv;
mod validity_period;

pub use auth_tag::AuthTag;
pub use constants::{
    INVALID_SIGNATURE_SENTINEL, MAX_NAME_COMPONENTS, UNBOUNDED_END_MILLIS, tlv_type,
};
pub use data::{ContentType, Data};
pub use error::{DecodeError, DecodeErrorKind, NameError, ValidityPeriodError};
pub use interest::{Interest, auth_validity_hint};
pub use key_locator::KeyLocator;
pub use name::Name;
pub use signature::{Signature, signature_type};
pub use tlv::{Element, TlvEncoder, TlvReader, decode_nonneg};
pub use validity_period::{ValidityPeriod, unbounded_end, unbounded_start};
