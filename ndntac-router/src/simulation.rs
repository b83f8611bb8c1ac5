//! In-memory collaborators for driving a router in tests and evaluation.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use ndntac::{Data, Interest, Name};

use crate::{
    Accounting, AccountingError, ContentStore, FaceId, OutboundQueue, RouterId, RouterStats,
};

/// A content store backed by a sorted map.
///
/// A request matches stored data whose name it is a prefix of; the exact
/// name wins, then the smallest longer name.
///
/// # Examples
///
/// ```
/// use ndntac::{Data, Interest, Name};
/// use ndntac_router::{ContentStore, InMemoryContentStore};
///
/// let mut store = InMemoryContentStore::new();
/// store.insert(Data::new(Name::parse("/video/clip/seg0").unwrap()));
///
/// let hit = store.find(&Interest::new(Name::parse("/video/clip").unwrap()));
/// assert!(hit.is_some());
/// assert!(store.find(&Interest::new(Name::parse("/audio").unwrap())).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentStore {
    entries: BTreeMap<Name, Data>,
}

impl InMemoryContentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data`, replacing any entry with the same name.
    pub fn insert(&mut self, data: Data) {
        self.entries.insert(data.name().clone(), data);
    }

    /// Removes and returns the entry with exactly this name.
    pub fn remove(&mut self, name: &Name) -> Option<Data> {
        self.entries.remove(name)
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContentStore for InMemoryContentStore {
    fn find(&self, interest: &Interest) -> Option<Data> {
        // Extensions of a name sort directly after it.
        self.entries
            .range(interest.name().clone()..)
            .next()
            .filter(|(name, _)| interest.name().is_prefix_of(name))
            .map(|(_, data)| data.clone())
    }
}

/// A transmission recorded by [`RecordingQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentData {
    /// Destination face
    pub face: FaceId,
    /// What was sent
    pub data: Data,
    /// Total delay queued before this send
    pub scheduled_after: Duration,
}

/// An outbound queue that records instead of transmitting.
#[derive(Debug, Clone, Default)]
pub struct RecordingQueue {
    delays: Vec<Duration>,
    sent: Vec<SentData>,
    total_delay: Duration,
}

impl RecordingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every delay in the order charged.
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Returns every transmission in order.
    #[must_use]
    pub fn sent(&self) -> &[SentData] {
        &self.sent
    }

    /// Returns the accumulated delay.
    #[must_use]
    pub const fn total_delay(&self) -> Duration {
        self.total_delay
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.delays.clear();
        self.sent.clear();
        self.total_delay = Duration::ZERO;
    }
}

impl OutboundQueue for RecordingQueue {
    fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
        self.total_delay += duration;
    }

    fn send_data(&mut self, face: FaceId, data: Data) {
        self.sent.push(SentData {
            face,
            data,
            scheduled_after: self.total_delay,
        });
    }
}

/// An event recorded by [`RecordingAccounting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountingEvent {
    /// A router announced itself.
    RouterRegistered {
        /// The router
        router: RouterId,
    },
    /// A request arrived.
    Received {
        /// The router
        router: RouterId,
        /// The requested name
        name: Name,
    },
    /// A request was answered with content.
    Satisfied {
        /// The router
        router: RouterId,
        /// The requested name
        name: Name,
    },
    /// A request was refused.
    Denied {
        /// The router
        router: RouterId,
        /// The requested name
        name: Name,
        /// Why
        reason: String,
    },
    /// A request went upstream.
    Forwarded {
        /// The router
        router: RouterId,
        /// The requested name
        name: Name,
    },
    /// Upstream confirmed a tag.
    AuthSatisfied {
        /// The router
        router: RouterId,
        /// The data name
        name: Name,
    },
    /// A free-form event.
    Other {
        /// The router
        router: RouterId,
        /// The message
        message: String,
    },
}

impl AccountingEvent {
    /// Returns the router the event belongs to.
    #[must_use]
    pub const fn router(&self) -> RouterId {
        match self {
            Self::RouterRegistered { router }
            | Self::Received { router, .. }
            | Self::Satisfied { router, .. }
            | Self::Denied { router, .. }
            | Self::Forwarded { router, .. }
            | Self::AuthSatisfied { router, .. }
            | Self::Other { router, .. } => *router,
        }
    }
}

/// An accounting sink that keeps every event in memory.
///
/// Events for routers that never registered are rejected with
/// `AccountingError::UnknownRouter`. [`set_failing`](Self::set_failing)
/// makes every call fail, for exercising best-effort handling.
#[derive(Debug, Clone, Default)]
pub struct RecordingAccounting {
    routers: BTreeSet<RouterId>,
    events: Vec<AccountingEvent>,
    failing: bool,
}

impl RecordingAccounting {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Returns every accepted event in order.
    #[must_use]
    pub fn events(&self) -> &[AccountingEvent] {
        &self.events
    }

    /// Returns true if `router` has registered.
    #[must_use]
    pub fn is_registered(&self, router: RouterId) -> bool {
        self.routers.contains(&router)
    }

    /// Aggregates the events of one router.
    #[must_use]
    pub fn stats(&self, router: RouterId) -> RouterStats {
        let mut stats = RouterStats::new();
        for event in self.events.iter().filter(|event| event.router() == router) {
            match event {
                AccountingEvent::RouterRegistered { .. } => {}
                AccountingEvent::Received { .. } => stats.received += 1,
                AccountingEvent::Satisfied { .. } => stats.satisfied += 1,
                AccountingEvent::Denied { reason, .. } => {
                    stats.denied += 1;
                    *stats.denials_by_reason.entry(reason.clone()).or_insert(0) += 1;
                }
                AccountingEvent::Forwarded { .. } => stats.forwarded += 1,
                AccountingEvent::AuthSatisfied { .. } => stats.auth_satisfied += 1,
                AccountingEvent::Other { .. } => stats.other += 1,
            }
        }
        stats
    }

    fn record(&mut self, event: AccountingEvent) -> Result<(), AccountingError> {
        if self.failing {
            return Err(AccountingError::unavailable("recording disabled"));
        }
        let router = event.router();
        let registering = matches!(event, AccountingEvent::RouterRegistered { .. });
        if !registering && !self.routers.contains(&router) {
            return Err(AccountingError::UnknownRouter { router });
        }
        if registering {
            self.routers.insert(router);
        }
        self.events.push(event);
        Ok(())
    }
}

impl Accounting for RecordingAccounting {
    fn register_router(&mut self, router: RouterId) -> Result<(), AccountingError> {
        self.record(AccountingEvent::RouterRegistered { router })
    }

    fn received_request(&mut self, router: RouterId, name: &Name) -> Result<(), AccountingError> {
        self.record(AccountingEvent::Received {
            router,
            name: name.clone(),
        })
    }

    fn satisfied_request(
        &mut self,
        router: RouterId,
        name: &Name,
    ) -> Result<(), AccountingError> {
        self.record(AccountingEvent::Satisfied {
            router,
            name: name.clone(),
        })
    }

    fn denied_request(
        &mut self,
        router: RouterId,
        name: &Name,
        reason: &str,
    ) -> Result<(), AccountingError> {
        self.record(AccountingEvent::Denied {
            router,
            name: name.clone(),
            reason: reason.to_string(),
        })
    }

    fn forwarded_request(
        &mut self,
        router: RouterId,
        name: &Name,
    ) -> Result<(), AccountingError> {
        self.record(AccountingEvent::Forwarded {
            router,
            name: name.clone(),
        })
    }

    fn auth_satisfied(&mut self, router: RouterId, name: &Name) -> Result<(), AccountingError> {
        self.record(AccountingEvent::AuthSatisfied {
            router,
            name: name.clone(),
        })
    }

    fn other(&mut self, router: RouterId, message: &str) -> Result<(), AccountingError> {
        self.record(AccountingEvent::Other {
            router,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    #[test]
    fn store_prefers_exact_match() {
        let mut store = InMemoryContentStore::new();
        store.insert(Data::new(name("/a/b")));
        store.insert(Data::new(name("/a/b/c")));

        let hit = store.find(&Interest::new(name("/a/b"))).unwrap();
        assert_eq!(hit.name(), &name("/a/b"));

        let hit = store.find(&Interest::new(name("/a"))).unwrap();
        assert_eq!(hit.name(), &name("/a/b"));
    }

    #[test]
    fn store_misses_siblings() {
        let mut store = InMemoryContentStore::new();
        store.insert(Data::new(name("/a/c")));
        assert!(store.find(&Interest::new(name("/a/b"))).is_none());
        assert_eq!(store.remove(&name("/a/c")).map(|d| d.name().clone()), Some(name("/a/c")));
        assert!(store.is_empty());
    }

    #[test]
    fn queue_tracks_delay_at_send() {
        let mut queue = RecordingQueue::new();
        queue.delay(Duration::from_nanos(5));
        queue.send_data(FaceId::new(1), Data::new(name("/x")));
        queue.delay(Duration::from_nanos(7));

        assert_eq!(queue.total_delay(), Duration::from_nanos(12));
        assert_eq!(queue.sent()[0].scheduled_after, Duration::from_nanos(5));
        assert_eq!(queue.delays().len(), 2);

        queue.clear();
        assert!(queue.sent().is_empty());
        assert_eq!(queue.total_delay(), Duration::ZERO);
    }

    #[test]
    fn accounting_requires_registration() {
        let mut accounting = RecordingAccounting::new();
        let router = RouterId::new(3);

        let err = accounting.received_request(router, &name("/a")).unwrap_err();
        assert!(err.is_unknown_router());

        accounting.register_router(router).unwrap();
        accounting.received_request(router, &name("/a")).unwrap();
        accounting.denied_request(router, &name("/a"), "nope").unwrap();
        accounting.other(router, "note").unwrap();

        let stats = accounting.stats(router);
        assert_eq!(stats.received(), 1);
        assert_eq!(stats.denied(), 1);
        assert_eq!(stats.denials_for("nope"), 1);
        assert_eq!(stats.other, 1);
        assert!(accounting.stats(RouterId::new(4)).denials_by_reason.is_empty());
    }

    #[test]
    fn failing_accounting_records_nothing() {
        let mut accounting = RecordingAccounting::new();
        accounting.set_failing(true);
        assert!(accounting.register_router(RouterId::new(1)).is_err());
        assert!(accounting.events().is_empty());
        assert!(!accounting.is_registered(RouterId::new(1)));
    }
}
