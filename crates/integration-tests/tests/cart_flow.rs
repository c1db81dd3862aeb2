//! End-to-end optimistic cart scenarios across multiple reconcilers.
//!
//! These exercise the full optimistic-then-reconcile contract the way a
//! browser session would: several tabs sharing one invalidation bus,
//! mutations racing, failures mid-flight.

#![allow(clippy::unwrap_used)]

use dukkan_core::cart::{CartReconciler, InMemoryBus};
use dukkan_core::types::ProductId;

const OLIVE_OIL: ProductId = ProductId::new(1);
const RICE: ProductId = ProductId::new(2);

#[derive(Debug, PartialEq, Eq)]
struct OutOfStock;

#[tokio::test]
async fn test_shopping_session_across_two_tabs() {
    let bus = InMemoryBus::new();
    let mut tab_a = CartReconciler::new(bus.clone());
    let mut tab_b = CartReconciler::new(bus.clone());

    // Tab A adds two bottles; the display updates before the server answers.
    tab_a.begin_add(OLIVE_OIL, 2);
    assert_eq!(tab_a.quantity_of(OLIVE_OIL, 0), 2);

    // Tab B has not seen anything yet and still trusts the old server state.
    assert_eq!(tab_b.quantity_of(OLIVE_OIL, 0), 0);

    // The server confirms; exactly one signal goes out.
    let outcome: Result<(), OutOfStock> = tab_a.complete(Ok(()));
    assert!(outcome.is_ok());
    assert_eq!(bus.publish_count(), 1);

    // Tab B observes the signal, drops nothing it had, and re-reads the
    // authoritative quantity.
    assert!(tab_b.synchronize());
    assert_eq!(tab_b.quantity_of(OLIVE_OIL, 2), 2);
}

#[tokio::test]
async fn test_failed_mutation_does_not_strand_either_tab() {
    let bus = InMemoryBus::new();
    let mut tab_a = CartReconciler::new(bus.clone());
    let mut tab_b = CartReconciler::new(bus.clone());

    tab_b.begin_inc(RICE);
    assert_eq!(tab_b.quantity_of(RICE, 1), 2);

    // Tab A's add fails server-side. The signal still fires.
    let result: Result<(), OutOfStock> = tab_a.add(OLIVE_OIL, 5, async { Err(OutOfStock) }).await;
    assert_eq!(result, Err(OutOfStock));
    assert_eq!(bus.publish_count(), 1);

    // Tab A shows no phantom bottles.
    assert_eq!(tab_a.quantity_of(OLIVE_OIL, 0), 0);

    // Tab B's unconfirmed increment is also discarded; the server quantity
    // of 1 is the only truth until it retries.
    assert!(tab_b.synchronize());
    assert_eq!(tab_b.quantity_of(RICE, 1), 1);
}

#[tokio::test]
async fn test_remove_then_readd_sequence() {
    let mut cart = CartReconciler::default();

    // Remove pins the line to zero no matter what the server claims.
    cart.begin_remove(RICE);
    assert_eq!(cart.quantity_of(RICE, 3), 0);

    // A subsequent add on the same line replaces the forced zero.
    cart.begin_add(RICE, 1);
    assert_eq!(cart.quantity_of(RICE, 3), 1);

    let _: Result<(), OutOfStock> = cart.complete(Ok(()));
    assert_eq!(cart.quantity_of(RICE, 1), 1);
}

#[tokio::test]
async fn test_checkout_clears_every_tab() {
    let bus = InMemoryBus::new();
    let mut shopping_tab = CartReconciler::new(bus.clone());
    let mut checkout_tab = CartReconciler::new(bus.clone());

    shopping_tab.begin_inc(OLIVE_OIL);
    assert!(shopping_tab.has_pending());

    // Checkout empties the cart server-side.
    let result: Result<(), OutOfStock> = checkout_tab.clear(async { Ok(()) }).await;
    assert!(result.is_ok());

    // The shopping tab reconciles to the now-empty cart.
    assert!(shopping_tab.synchronize());
    assert!(!shopping_tab.has_pending());
    assert_eq!(shopping_tab.quantity_of(OLIVE_OIL, 0), 0);
}

#[tokio::test]
async fn test_rapid_stepper_clicks_batch_into_one_delta() {
    let bus = InMemoryBus::new();
    let mut cart = CartReconciler::new(bus.clone());

    // Four quick + clicks and one -, all before any server round trip.
    for _ in 0..4 {
        cart.begin_inc(OLIVE_OIL);
    }
    cart.begin_dec(OLIVE_OIL);
    assert_eq!(cart.quantity_of(OLIVE_OIL, 2), 5);

    // One confirmation, one signal, and the delta map is empty.
    let _: Result<(), OutOfStock> = cart.complete(Ok(()));
    assert_eq!(bus.publish_count(), 1);
    assert!(!cart.has_pending());
    assert_eq!(cart.quantity_of(OLIVE_OIL, 5), 5);
}
