//! The forwarding strategy that puts the admission pipeline on the request path.

use chrono::Utc;
use ndntac::{ContentType, Data, Interest, Name};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    Accounting, AccountingError, AdmissionOutcome, AdmissionPipeline, AuthCache, ContentStore,
    Disposition, FaceId, OutboundQueue, RouterConfig, RouterError, RouterId, make_auth_denial,
};

/// A request waiting for upstream data, with the requests aggregated under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    interest: Interest,
    in_faces: Vec<FaceId>,
    related: Vec<PendingEntry>,
}

impl PendingEntry {
    /// Creates an entry for `interest` with no faces and no related entries.
    #[must_use]
    pub fn new(interest: Interest) -> Self {
        Self {
            interest,
            in_faces: Vec::new(),
            related: Vec::new(),
        }
    }

    /// Adds a face the request arrived on.
    #[must_use]
    pub fn with_in_face(mut self, face: FaceId) -> Self {
        self.in_faces.push(face);
        self
    }

    /// Aggregates another request under this entry.
    #[must_use]
    pub fn with_related(mut self, entry: PendingEntry) -> Self {
        self.related.push(entry);
        self
    }

    /// Returns the request.
    #[must_use]
    pub const fn interest(&self) -> &Interest {
        &self.interest
    }

    /// Returns the faces the request arrived on.
    #[must_use]
    pub fn in_faces(&self) -> &[FaceId] {
        &self.in_faces
    }

    /// Returns every aggregated entry, depth first, excluding this one.
    #[must_use]
    pub fn related_entries(&self) -> Vec<&PendingEntry> {
        let mut entries = Vec::new();
        for entry in &self.related {
            entries.push(entry);
            entries.extend(entry.related_entries());
        }
        entries
    }
}

/// Admission control at one forwarding node.
///
/// Looks each request up in the local content store. On a hit it runs the
/// [`AdmissionPipeline`], hands the charged delays to the outbound queue,
/// and sends exactly one response: the content or a denial wrapping it. On a
/// miss the request is forwarded. Every step is reported to accounting;
/// accounting failures are logged and otherwise ignored.
///
/// # Examples
///
/// ```
/// use ndntac::{Data, Interest, Name};
/// use ndntac_router::{
///     FaceId, InMemoryContentStore, RecordingAccounting, RecordingQueue, RouterConfig,
///     RouterId, RouterStrategy,
/// };
///
/// let mut store = InMemoryContentStore::new();
/// store.insert(Data::new(Name::parse("/public/notice").unwrap()));
///
/// let mut router = RouterStrategy::new(
///     RouterId::new(1),
///     RouterConfig::default().with_rng_seed(7),
///     store,
///     RecordingQueue::new(),
///     RecordingAccounting::new(),
/// )
/// .unwrap();
///
/// let interest = Interest::new(Name::parse("/public/notice").unwrap());
/// assert!(router.on_incoming_interest(FaceId::new(0), &interest));
/// assert_eq!(router.queue().sent().len(), 1);
/// assert_eq!(router.accounting().stats(RouterId::new(1)).satisfied(), 1);
/// ```
#[derive(Debug)]
pub struct RouterStrategy<S, Q, A, R = ChaCha8Rng> {
    router_id: RouterId,
    config: RouterConfig,
    pipeline: AdmissionPipeline<R>,
    store: S,
    queue: Q,
    accounting: A,
}

impl<S, Q, A> RouterStrategy<S, Q, A, ChaCha8Rng>
where
    S: ContentStore,
    Q: OutboundQueue,
    A: Accounting,
{
    /// Creates a strategy and registers `router_id` with accounting.
    ///
    /// The delegation draw is seeded from `config.rng_seed`, or from entropy.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if the configuration is invalid.
    pub fn new(
        router_id: RouterId,
        config: RouterConfig,
        store: S,
        queue: Q,
        accounting: A,
    ) -> Result<Self, RouterError> {
        let seed = config.rng_seed.unwrap_or_else(rand::random);
        Self::with_rng(
            router_id,
            config,
            store,
            queue,
            accounting,
            ChaCha8Rng::seed_from_u64(seed),
        )
    }
}

impl<S, Q, A, R> RouterStrategy<S, Q, A, R>
where
    S: ContentStore,
    Q: OutboundQueue,
    A: Accounting,
    R: RngCore,
{
    /// Creates a strategy drawing from `rng` and registers `router_id` with
    /// accounting.
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if the configuration is invalid.
    pub fn with_rng(
        router_id: RouterId,
        config: RouterConfig,
        store: S,
        queue: Q,
        accounting: A,
        rng: R,
    ) -> Result<Self, RouterError> {
        let pipeline = AdmissionPipeline::with_rng(&config, rng)?;
        let mut strategy = Self {
            router_id,
            config,
            pipeline,
            store,
            queue,
            accounting,
        };
        let result = strategy.accounting.register_router(router_id);
        strategy.account("register", result);
        Ok(strategy)
    }

    /// Returns this router's identifier.
    #[must_use]
    pub const fn router_id(&self) -> RouterId {
        self.router_id
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns the verification cache.
    #[must_use]
    pub const fn auth_cache(&self) -> &AuthCache {
        self.pipeline.auth_cache()
    }

    /// Returns the verification cache for seeding.
    pub fn auth_cache_mut(&mut self) -> &mut AuthCache {
        self.pipeline.auth_cache_mut()
    }

    /// Returns the content store.
    #[must_use]
    pub const fn content_store(&self) -> &S {
        &self.store
    }

    /// Returns the content store for populating.
    pub fn content_store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns the outbound queue.
    #[must_use]
    pub const fn queue(&self) -> &Q {
        &self.queue
    }

    /// Returns the outbound queue for draining.
    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// Returns the accounting sink.
    #[must_use]
    pub const fn accounting(&self) -> &A {
        &self.accounting
    }

    /// Returns the accounting sink for reconfiguring.
    pub fn accounting_mut(&mut self) -> &mut A {
        &mut self.accounting
    }

    /// Handles a request arriving on `face`.
    ///
    /// Returns true if the request was answered locally, false if it was
    /// forwarded.
    pub fn on_incoming_interest(&mut self, face: FaceId, interest: &Interest) -> bool {
        !matches!(
            self.process_interest(face, interest),
            Disposition::Forwarded
        )
    }

    /// Handles a request arriving on `face` and returns what became of it.
    pub fn process_interest(&mut self, face: FaceId, interest: &Interest) -> Disposition {
        let result = self
            .accounting
            .received_request(self.router_id, interest.name());
        self.account("received", result);
        self.queue.delay(self.config.interest_delay);

        match self.store.find(interest) {
            Some(data) => self.on_data_hit(face, interest, &data).disposition,
            None => {
                self.on_data_miss(interest);
                Disposition::Forwarded
            }
        }
    }

    /// Admits `interest` against locally available `data` and sends the
    /// response on `face`.
    pub fn on_data_hit(
        &mut self,
        face: FaceId,
        interest: &Interest,
        data: &Data,
    ) -> AdmissionOutcome {
        let outcome = self.pipeline.evaluate(
            interest.auth_tag(),
            data,
            interest.auth_validity_probability(),
            Utc::now(),
        );
        for charge in &outcome.delays {
            tracing::debug!(
                router = %self.router_id,
                kind = ?charge.kind,
                ns = charge.duration.as_nanos(),
                "delay charged"
            );
            self.queue.delay(charge.duration);
        }

        let mut response = data.clone();
        if outcome.no_recache {
            response.set_no_recache_flag(true);
        }

        if let Some(reason) = outcome.denial_reason() {
            let result =
                self.accounting
                    .denied_request(self.router_id, interest.name(), reason.as_str());
            self.account("denied", result);
            self.queue.send_data(face, make_auth_denial(&response));
        } else {
            let result = self
                .accounting
                .satisfied_request(self.router_id, interest.name());
            self.account("satisfied", result);
            self.queue.send_data(face, response);
        }
        outcome
    }

    /// Records that `interest` missed locally and goes upstream.
    pub fn on_data_miss(&mut self, interest: &Interest) {
        tracing::debug!(router = %self.router_id, name = %interest.name(), "forwarding on miss");
        let result = self
            .accounting
            .forwarded_request(self.router_id, interest.name());
        self.account("forwarded", result);
    }

    /// Handles upstream `data` arriving for `entry`.
    ///
    /// The entry's own request is already answered by the data itself.
    /// Every aggregated request is admitted individually, once per face it
    /// arrived on. The upstream data is then recorded by content type.
    /// Returns the outcomes of the aggregated requests.
    pub fn before_satisfy_interest(
        &mut self,
        entry: &PendingEntry,
        data: &Data,
    ) -> Vec<AdmissionOutcome> {
        let mut outcomes = Vec::new();
        for related in entry.related_entries() {
            for &face in related.in_faces() {
                let message = format!("De-aggregation of {}", related.interest().name());
                let result = self.accounting.other(self.router_id, &message);
                self.account("other", result);
                outcomes.push(self.on_data_hit(face, related.interest(), data));
            }
        }

        self.record_upstream(data.content_type(), data.name());
        outcomes
    }

    fn record_upstream(&mut self, content_type: ContentType, name: &Name) {
        let router = self.router_id;
        let (event, result) = match content_type {
            ContentType::Blob => (
                "satisfied",
                self.accounting.satisfied_request(router, name),
            ),
            ContentType::AuthGranted => (
                "auth-satisfied",
                self.accounting.auth_satisfied(router, name),
            ),
            ContentType::EndOfContent => ("other", self.accounting.other(router, "Found EoC")),
            _ => (
                "denied",
                self.accounting.denied_request(router, name, "upstream"),
            ),
        };
        self.account(event, result);
    }

    fn account(&self, event: &'static str, result: Result<(), AccountingError>) {
        if let Err(error) = result {
            tracing::warn!(router = %self.router_id, event, %error, "accounting call failed");
        }
    }
}
