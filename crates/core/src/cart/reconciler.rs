//! The optimistic cart reconciler.

use crate::types::ProductId;

use super::bus::{InMemoryBus, InvalidationBus, InvalidationSubscription};
use super::delta::DeltaMap;

/// Presents an immediately-updated cart while the authoritative mutation
/// is in flight, then reconciles once the round trip completes.
///
/// Every mutation follows the same shape:
///
/// 1. apply the optimistic delta to the local [`DeltaMap`],
/// 2. run the server mutation,
/// 3. on any outcome, publish exactly one invalidation signal on the bus,
/// 4. observing the signal (own or a peer's) empties the delta map, after
///    which callers re-read authoritative quantities from the server.
///
/// Mutation errors are returned to the caller; the signal fires anyway so
/// no view is left stuck on a phantom optimistic value.
///
/// The two-phase `begin_*` / [`complete`](Self::complete) API mirrors the
/// round trip explicitly; the async methods wrap both phases around a
/// caller-supplied server future.
#[derive(Debug)]
pub struct CartReconciler<B: InvalidationBus = InMemoryBus> {
    deltas: DeltaMap,
    bus: B,
    subscription: B::Subscription,
}

impl<B: InvalidationBus> CartReconciler<B> {
    /// Create a reconciler attached to `bus`.
    pub fn new(bus: B) -> Self {
        let subscription = bus.subscribe();
        Self {
            deltas: DeltaMap::new(),
            bus,
            subscription,
        }
    }

    /// Effective displayed quantity from a caller-supplied authoritative
    /// server quantity and the current local delta. Pure read; never
    /// performs I/O and never observes the bus.
    #[must_use]
    pub fn quantity_of(&self, product: ProductId, server_quantity: u32) -> u32 {
        self.deltas.effective_quantity(product, server_quantity)
    }

    /// Whether any optimistic delta is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.deltas.is_empty()
    }

    /// Observe the bus; if a signal was published since the last check,
    /// discard all pending deltas. Returns `true` if state was discarded.
    pub fn synchronize(&mut self) -> bool {
        if self.subscription.take_invalidation() {
            self.deltas.clear();
            return true;
        }
        false
    }

    /// Optimistically add `qty` of `product`.
    pub fn begin_add(&mut self, product: ProductId, qty: u32) {
        self.deltas.adjust(product, i64::from(qty));
    }

    /// Optimistically increment `product` by one.
    pub fn begin_inc(&mut self, product: ProductId) {
        self.deltas.adjust(product, 1);
    }

    /// Optimistically decrement `product` by one.
    pub fn begin_dec(&mut self, product: ProductId) {
        self.deltas.adjust(product, -1);
    }

    /// Optimistically remove `product`; it reads zero from now until the
    /// next reconciliation regardless of the server quantity.
    pub fn begin_remove(&mut self, product: ProductId) {
        self.deltas.force_zero(product);
    }

    /// Empty the delta map synchronously, ahead of a server-side clear.
    pub fn begin_clear(&mut self) {
        self.deltas.clear();
    }

    /// Finish a mutation round trip: publish the invalidation signal and
    /// observe it, whatever the outcome was. The outcome is handed back
    /// unchanged so callers keep their error handling.
    pub fn complete<T, E>(&mut self, outcome: Result<T, E>) -> Result<T, E> {
        self.bus.publish();
        self.synchronize();
        outcome
    }

    /// Add `qty` of `product`: optimistic delta, server future, signal.
    ///
    /// # Errors
    ///
    /// Propagates the server error; the invalidation signal fires either
    /// way.
    pub async fn add<F, T, E>(&mut self, product: ProductId, qty: u32, server: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.begin_add(product, qty);
        let outcome = server.await;
        self.complete(outcome)
    }

    /// Increment `product` by one with the optimistic-then-reconcile flow.
    ///
    /// # Errors
    ///
    /// Propagates the server error; the invalidation signal fires either
    /// way.
    pub async fn inc<F, T, E>(&mut self, product: ProductId, server: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.begin_inc(product);
        let outcome = server.await;
        self.complete(outcome)
    }

    /// Decrement `product` by one with the optimistic-then-reconcile flow.
    ///
    /// # Errors
    ///
    /// Propagates the server error; the invalidation signal fires either
    /// way.
    pub async fn dec<F, T, E>(&mut self, product: ProductId, server: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.begin_dec(product);
        let outcome = server.await;
        self.complete(outcome)
    }

    /// Remove `product` with the optimistic-then-reconcile flow.
    ///
    /// # Errors
    ///
    /// Propagates the server error; the invalidation signal fires either
    /// way.
    pub async fn remove<F, T, E>(&mut self, product: ProductId, server: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.begin_remove(product);
        let outcome = server.await;
        self.complete(outcome)
    }

    /// Clear the cart: the delta map empties synchronously before the
    /// server confirmation arrives.
    ///
    /// # Errors
    ///
    /// Propagates the server error; the invalidation signal fires either
    /// way.
    pub async fn clear<F, T, E>(&mut self, server: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.begin_clear();
        let outcome = server.await;
        self.complete(outcome)
    }
}

impl Default for CartReconciler<InMemoryBus> {
    fn default() -> Self {
        Self::new(InMemoryBus::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCT_A: ProductId = ProductId::new(11);
    const PRODUCT_B: ProductId = ProductId::new(22);

    #[derive(Debug, PartialEq, Eq)]
    struct ServerDown;

    #[test]
    fn test_pending_mutations_compose_with_server_quantity() {
        // Property: for any add/inc/dec sequence not yet confirmed,
        // quantity_of == max(0, server + sum(deltas)).
        let mut cart = CartReconciler::default();
        cart.begin_add(PRODUCT_A, 2);
        cart.begin_inc(PRODUCT_A);
        cart.begin_dec(PRODUCT_A);
        cart.begin_inc(PRODUCT_A);
        assert_eq!(cart.quantity_of(PRODUCT_A, 1), 4);

        cart.begin_dec(PRODUCT_B);
        cart.begin_dec(PRODUCT_B);
        assert_eq!(cart.quantity_of(PRODUCT_B, 1), 0);
    }

    #[test]
    fn test_remove_forces_zero_until_reconciled() {
        let mut cart = CartReconciler::default();
        cart.begin_remove(PRODUCT_A);
        assert_eq!(cart.quantity_of(PRODUCT_A, 0), 0);
        assert_eq!(cart.quantity_of(PRODUCT_A, 5), 0);
        assert_eq!(cart.quantity_of(PRODUCT_A, 100), 0);

        // Reconciliation restores the server as the only truth.
        let _ = cart.complete::<(), ServerDown>(Ok(()));
        assert_eq!(cart.quantity_of(PRODUCT_A, 5), 5);
    }

    #[test]
    fn test_signal_fires_exactly_once_per_mutation() {
        let bus = InMemoryBus::new();
        let mut cart = CartReconciler::new(bus.clone());

        cart.begin_add(PRODUCT_A, 1);
        let _ = cart.complete::<(), ServerDown>(Ok(()));
        assert_eq!(bus.publish_count(), 1);
        assert!(!cart.has_pending());

        cart.begin_inc(PRODUCT_A);
        let _ = cart.complete::<(), ServerDown>(Err(ServerDown));
        assert_eq!(bus.publish_count(), 2);
        assert!(!cart.has_pending());
    }

    #[test]
    fn test_peer_listener_clears_on_signal() {
        // One bus, two reconcilers: the cross-tab storage-event path.
        let bus = InMemoryBus::new();
        let mut tab_a = CartReconciler::new(bus.clone());
        let mut tab_b = CartReconciler::new(bus.clone());

        tab_b.begin_inc(PRODUCT_B);
        assert_eq!(tab_b.quantity_of(PRODUCT_B, 1), 2);

        tab_a.begin_add(PRODUCT_A, 1);
        let _ = tab_a.complete::<(), ServerDown>(Ok(()));

        // Tab B observes the signal and discards its own optimistic state.
        assert!(tab_b.synchronize());
        assert!(!tab_b.has_pending());
        assert_eq!(tab_b.quantity_of(PRODUCT_B, 1), 1);
    }

    #[test]
    fn test_clear_empties_map_before_server_confirms() {
        let mut cart = CartReconciler::default();
        cart.begin_add(PRODUCT_A, 3);
        cart.begin_remove(PRODUCT_B);
        assert!(cart.has_pending());

        cart.begin_clear();
        // Synchronously empty, no server confirmation yet.
        assert!(!cart.has_pending());
        assert_eq!(cart.quantity_of(PRODUCT_B, 4), 4);
    }

    #[test]
    fn test_inc_then_confirm_scenario() {
        // Server cart has {A: 2}. inc(A) shows 3 immediately; after the
        // server confirms and the new truth is 3, the display stays 3.
        let mut cart = CartReconciler::default();
        cart.begin_inc(PRODUCT_A);
        assert_eq!(cart.quantity_of(PRODUCT_A, 2), 3);

        let _ = cart.complete::<(), ServerDown>(Ok(()));
        assert!(!cart.has_pending());
        assert_eq!(cart.quantity_of(PRODUCT_A, 3), 3);
    }

    #[test]
    fn test_failed_add_still_fires_signal() {
        let bus = InMemoryBus::new();
        let mut cart = CartReconciler::new(bus.clone());

        cart.begin_add(PRODUCT_B, 1);
        assert_eq!(cart.quantity_of(PRODUCT_B, 0), 1);

        let result = cart.complete::<(), ServerDown>(Err(ServerDown));
        assert_eq!(result, Err(ServerDown));
        assert_eq!(bus.publish_count(), 1);

        // Not stuck on the phantom optimistic quantity.
        assert_eq!(cart.quantity_of(PRODUCT_B, 0), 0);
    }

    #[tokio::test]
    async fn test_async_add_wraps_both_phases() {
        let bus = InMemoryBus::new();
        let mut cart = CartReconciler::new(bus.clone());

        let result: Result<(), ServerDown> =
            cart.add(PRODUCT_A, 2, async { Ok(()) }).await;
        assert!(result.is_ok());
        assert_eq!(bus.publish_count(), 1);
        assert!(!cart.has_pending());
    }

    #[tokio::test]
    async fn test_async_remove_propagates_error_after_signal() {
        let bus = InMemoryBus::new();
        let mut cart = CartReconciler::new(bus.clone());

        let result: Result<(), ServerDown> =
            cart.remove(PRODUCT_A, async { Err(ServerDown) }).await;
        assert_eq!(result, Err(ServerDown));
        assert_eq!(bus.publish_count(), 1);
        assert!(!cart.has_pending());
    }
}
