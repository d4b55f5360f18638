//! Remote synchronization layer.
//!
//! # Responsibility
//! - Keep every subscribed session eventually consistent with the
//!   persisted ledger document.
//! - Echo each accepted save to all subscribers, including the writer.
//!
//! # Invariants
//! - Snapshots are delivered in save order per path.
//! - A subscription lives until its handle is dropped; there is no
//!   timeout or cancellation beyond that.

mod hub;

pub use hub::{DocumentHub, DocumentSnapshot, Subscription, SyncError, SyncResult};
