//! Optimistic cart reconciliation.
//!
//! Cart mutations are shown to the user immediately while the
//! authoritative write is in flight, then reconciled by discarding all
//! optimistic state in favor of a fresh server read. No attempt is made
//! to merge individual server responses into pending deltas; correlating
//! responses to deltas under rapid input is not worth the complexity when
//! a refetch restores truth in one round trip.
//!
//! # Pieces
//!
//! - [`Delta`] - a pending signed adjustment, or a forced-zero marker for
//!   removed lines
//! - [`DeltaMap`] - pure state container mapping products to deltas, with
//!   a reducer-style `apply`
//! - [`InvalidationBus`] - abstract cross-context "cart changed" signal;
//!   [`InMemoryBus`] is the in-process implementation (cloned handles
//!   stand in for browser tabs)
//! - [`CartReconciler`] - ties a delta map to a bus handle: every
//!   mutation applies its delta first, then publishes exactly one signal
//!   when the server round trip completes, success or failure
//!
//! # Invariants
//!
//! - Effective quantity is `max(0, server + sum(adjustments))`; a removed
//!   line reads zero regardless of the server quantity until the next
//!   reconciliation.
//! - Every subscriber that observes a signal empties its delta map.
//!
//! Invalidation is deliberately coarse: one mutation anywhere discards
//! every pending delta, not just the mutated product's.

mod bus;
mod delta;
mod reconciler;

pub use bus::{InMemoryBus, InMemorySubscription, InvalidationBus, InvalidationSubscription};
pub use delta::{Delta, DeltaMap};
pub use reconciler::CartReconciler;
