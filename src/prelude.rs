//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use ndntac::prelude::*;
//!
//! let tag = AuthTag::with_access_level(1).with_prefix(Name::parse("/a").unwrap());
//! assert!(tag.is_present());
//! ```
//!
//! The TLV codec types are left out; import them from the crate root.

pub use crate::{
    // Core types
    AuthTag, ContentType, Data, Interest, KeyLocator, Name, Signature, ValidityPeriod,
    // Helpers
    auth_validity_hint, unbounded_end, unbounded_start,
    // Errors
    DecodeError, DecodeErrorKind, NameError, ValidityPeriodError,
    // Constants
    INVALID_SIGNATURE_SENTINEL, MAX_NAME_COMPONENTS,
};
