//! Constants for the wire format and token validation.

/// Maximum number of components in a name.
pub const MAX_NAME_COMPONENTS: usize = 64;

/// First byte of a signature value that marks it as invalid.
///
/// The router treats any non-empty signature value whose first byte differs
/// from this sentinel as a successful verification.
pub const INVALID_SIGNATURE_SENTINEL: u8 = 0;

/// Milliseconds since the Unix epoch of the latest representable expiration
/// time (9999-12-31T23:59:59Z).
pub const UNBOUNDED_END_MILLIS: i64 = 253_402_300_799_000;

/// TLV type numbers.
///
/// Types below 200 follow the NDN packet format; 200 and above are the
/// access-control extensions.
pub mod tlv_type {
    /// Data packet.
    pub const DATA: u64 = 6;
    /// Name.
    pub const NAME: u64 = 7;
    /// Generic name component.
    pub const NAME_COMPONENT: u64 = 8;
    /// Data meta information.
    pub const META_INFO: u64 = 20;
    /// Data content.
    pub const CONTENT: u64 = 21;
    /// Signature information block.
    pub const SIGNATURE_INFO: u64 = 22;
    /// Signature value block.
    pub const SIGNATURE_VALUE: u64 = 23;
    /// Content type inside meta information.
    pub const CONTENT_TYPE: u64 = 24;
    /// Freshness period in milliseconds.
    pub const FRESHNESS_PERIOD: u64 = 25;
    /// Signature type code.
    pub const SIGNATURE_TYPE: u64 = 27;
    /// Key locator.
    pub const KEY_LOCATOR: u64 = 28;
    /// Key digest form of a key locator.
    pub const KEY_DIGEST: u64 = 29;
    /// Validity period.
    pub const VALIDITY_PERIOD: u64 = 253;
    /// Validity period start.
    pub const NOT_BEFORE: u64 = 254;
    /// Validity period end.
    pub const NOT_AFTER: u64 = 255;
    /// Authorization tag.
    pub const AUTH_TAG: u64 = 200;
    /// Access level of a tag or data packet.
    pub const ACCESS_LEVEL: u64 = 201;
    /// Route hash of a tag.
    pub const ROUTE_HASH: u64 = 202;
    /// Consumer key locator of a tag.
    pub const CONSUMER_LOCATOR: u64 = 203;
    /// Flag telling downstream nodes not to re-cache a data packet.
    pub const NO_RECACHE: u64 = 204;
}
