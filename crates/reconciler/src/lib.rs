//! Title reconciliation and episode deduplication engine.
//!
//! One [`Reconciler::run`] call is one batch pass: decide whether the
//! subscription snapshot needs a refresh, walk the feed items, fuzzy-match
//! each against the live subscriptions, consult the episode ledger and hand
//! anything notification-worthy to the transport. All cross-run memory is
//! the [`PersistedState`] document, loaded once at the start and saved once
//! at the end.

pub mod config;
pub mod ledger;
pub mod models;
pub mod reconcile;
pub mod refresh;
pub mod rewrite;
pub mod state;

mod notify;
mod source;

pub use config::{Config, RewriteRule};
pub use ledger::EpisodeLedger;
pub use models::FeedItem;
pub use notify::Notifier;
pub use reconcile::{Reconciler, RunError, RunSummary};
pub use source::{MalSource, SubscriptionSource};
pub use state::{PersistedState, RunLock, StateError, StateStore};
