//! Admission control for tag-protected content at a forwarding node.
//!
//! This crate decides, at a node that has a requested object cached, whether
//! the request's [`AuthTag`](ndntac::AuthTag) entitles it to that object. It
//! includes:
//!
//! - **Admission pipeline**: [`AdmissionPipeline`], the ordered checks
//!   producing a [`Disposition`] and the delays they cost
//! - **Verification cache**: [`AuthCache`], a bloom filter of tags whose
//!   signatures already verified
//! - **Denials**: [`make_auth_denial`] wraps refused content so it can be
//!   recovered later with [`recover_denied_content`]
//! - **Router strategy**: [`RouterStrategy`], which drives the pipeline
//!   from incoming requests through the [`ContentStore`],
//!   [`OutboundQueue`] and [`Accounting`] collaborators
//! - **In-memory collaborators**: [`InMemoryContentStore`],
//!   [`RecordingQueue`] and [`RecordingAccounting`] for tests and evaluation
//!
//! # Overview
//!
//! On a local hit the pipeline runs these checks in order, stopping at the
//! first verdict:
//!
//! ```text
//! 1. content level 0                      -> release
//! 2. content level > tag level            -> deny
//! 3. tag expired                          -> deny
//! 4. tag prefix does not cover the name   -> deny
//! 5. content has no key locator           -> deny
//! 6. key locators differ                  -> deny
//! 7. hint h > 0 and draw < h              -> release (delegated)
//! 8. hint h > 0                           -> mark no-recache, skip 9
//! 9. hint 0 and tag in cache              -> release   [bloom delay]
//! 10. signature verifies                  -> release, cache tag
//!     otherwise                           -> deny      [signature delay]
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use ndntac::{AuthTag, Data, Interest, KeyLocator, Name, Signature};
//! use ndntac_router::{
//!     FaceId, InMemoryContentStore, RecordingAccounting, RecordingQueue, RouterConfig,
//!     RouterId, RouterStrategy,
//! };
//!
//! let key = KeyLocator::Name(Name::parse("/news/KEY/1").unwrap());
//! let mut store = InMemoryContentStore::new();
//! store.insert(
//!     Data::new(Name::parse("/news/premium/today").unwrap())
//!         .with_access_level(1)
//!         .with_signature(Signature::new().with_key_locator(key.clone()).with_value(vec![1])),
//! );
//!
//! let mut router = RouterStrategy::new(
//!     RouterId::new(1),
//!     RouterConfig::default().with_rng_seed(3),
//!     store,
//!     RecordingQueue::new(),
//!     RecordingAccounting::new(),
//! )
//! .unwrap();
//!
//! let tag = AuthTag::with_access_level(1)
//!     .with_prefix(Name::parse("/news/premium").unwrap())
//!     .with_key_locator(key)
//!     .with_signature_value(vec![0x99]);
//! let interest = Interest::new(Name::parse("/news/premium/today").unwrap()).with_auth_tag(tag);
//!
//! assert!(router.on_incoming_interest(FaceId::new(0), &interest));
//! assert_eq!(router.auth_cache().len(), 1);
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod auth_cache;
mod config;
mod decision;
mod denial;
mod error;
mod pipeline;
mod simulation;
mod stats;
mod strategy;
mod traits;

pub use auth_cache::AuthCache;
pub use config::RouterConfig;
pub use decision::{
    AdmissionOutcome, DelayCharge, DelayKind, DenialReason, Disposition, ReleasePath,
};
pub use denial::{make_auth_denial, recover_denied_content};
pub use error::{AccountingError, RouterError};
pub use pipeline::{AdmissionPipeline, check_credentials};
pub use simulation::{
    AccountingEvent, InMemoryContentStore, RecordingAccounting, RecordingQueue, SentData,
};
pub use stats::RouterStats;
pub use strategy::{PendingEntry, RouterStrategy};
pub use traits::{Accounting, ContentStore, FaceId, OutboundQueue, RouterId};
