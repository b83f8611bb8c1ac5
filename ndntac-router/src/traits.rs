//! Collaborator interfaces the router strategy drives.

use std::fmt;
use std::time::Duration;

use ndntac::{Data, Interest, Name};

use crate::AccountingError;

/// Identifies a forwarding node to the accounting collaborator.
///
/// Uniqueness is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterId(u64);

impl RouterId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RouterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A numbered attachment point responses are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceId(u32);

impl FaceId {
    /// Wraps a raw face number.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw face number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "face{}", self.0)
    }
}

/// Local content lookup.
///
/// The strategy calls [`find`](Self::find) once per incoming request and
/// never owns the underlying store.
pub trait ContentStore {
    /// Returns content matching the request, or `None` on a miss.
    fn find(&self, interest: &Interest) -> Option<Data>;
}

/// Outbound transmission and simulated processing time.
pub trait OutboundQueue {
    /// Pushes back the node's outbound schedule by `duration`.
    ///
    /// This is a logical cost handed to the event loop, never a sleep.
    fn delay(&mut self, duration: Duration);

    /// Queues `data` for delivery on `face`.
    fn send_data(&mut self, face: FaceId, data: Data);
}

/// Event accounting keyed by router.
///
/// Every method is best-effort: the strategy logs failures and ignores them.
pub trait Accounting {
    /// Announces a router.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn register_router(&mut self, router: RouterId) -> Result<(), AccountingError>;

    /// Records that a request arrived.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn received_request(&mut self, router: RouterId, name: &Name) -> Result<(), AccountingError>;

    /// Records that a request was answered with content.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn satisfied_request(&mut self, router: RouterId, name: &Name)
    -> Result<(), AccountingError>;

    /// Records that a request was refused, with a reason.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn denied_request(
        &mut self,
        router: RouterId,
        name: &Name,
        reason: &str,
    ) -> Result<(), AccountingError>;

    /// Records that a request missed locally and went upstream.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn forwarded_request(&mut self, router: RouterId, name: &Name)
    -> Result<(), AccountingError>;

    /// Records upstream data confirming a tag.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn auth_satisfied(&mut self, router: RouterId, name: &Name) -> Result<(), AccountingError>;

    /// Records a free-form event.
    ///
    /// # Errors
    ///
    /// Returns `AccountingError` if the sink rejects the event.
    fn other(&mut self, router: RouterId, message: &str) -> Result<(), AccountingError>;
}
