//! Pending cart deltas and the pure state container that holds them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A pending, unconfirmed adjustment to one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "qty")]
pub enum Delta {
    /// Signed quantity adjustment awaiting server confirmation.
    Adjust(i64),
    /// The line was removed; the displayed quantity is zero no matter
    /// what the server still reports.
    ForceZero,
}

impl Delta {
    /// Combine a later delta into this one.
    ///
    /// Adjustments sum; `ForceZero` absorbs everything on either side.
    /// Once a line is removed it stays at zero until reconciliation, even
    /// if further adjustments arrive before the signal.
    #[must_use]
    pub const fn combine(self, later: Self) -> Self {
        match (self, later) {
            (Self::Adjust(a), Self::Adjust(b)) => Self::Adjust(a + b),
            (Self::ForceZero, _) | (_, Self::ForceZero) => Self::ForceZero,
        }
    }
}

/// Transient client-side mapping from product to pending delta.
///
/// Pure state: no I/O, no clock, no channel. The reconciler layers the
/// invalidation protocol on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaMap {
    entries: HashMap<ProductId, Delta>,
}

impl DeltaMap {
    /// Create an empty delta map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reducer: fold `delta` into the pending state for `product`.
    pub fn apply(&mut self, product: ProductId, delta: Delta) {
        let next = match self.entries.get(&product) {
            Some(existing) => existing.combine(delta),
            None => delta,
        };
        self.entries.insert(product, next);
    }

    /// Apply a signed quantity adjustment.
    pub fn adjust(&mut self, product: ProductId, qty: i64) {
        self.apply(product, Delta::Adjust(qty));
    }

    /// Mark a line as removed.
    pub fn force_zero(&mut self, product: ProductId) {
        self.apply(product, Delta::ForceZero);
    }

    /// Discard all pending deltas.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether any delta is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The pending delta for `product`, if any.
    #[must_use]
    pub fn get(&self, product: ProductId) -> Option<Delta> {
        self.entries.get(&product).copied()
    }

    /// Effective displayed quantity for `product` given the
    /// caller-supplied authoritative server quantity.
    ///
    /// `max(0, server + sum(adjustments))`, or `0` for a removed line.
    /// Never performs I/O.
    #[must_use]
    pub fn effective_quantity(&self, product: ProductId, server_quantity: u32) -> u32 {
        match self.entries.get(&product) {
            None => server_quantity,
            Some(Delta::ForceZero) => 0,
            Some(Delta::Adjust(delta)) => {
                let effective = i64::from(server_quantity).saturating_add(*delta);
                u32::try_from(effective.max(0)).unwrap_or(u32::MAX)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLE: ProductId = ProductId::new(1);
    const BREAD: ProductId = ProductId::new(2);

    #[test]
    fn test_adjustments_sum() {
        let mut map = DeltaMap::new();
        map.adjust(APPLE, 2);
        map.adjust(APPLE, 3);
        map.adjust(APPLE, -1);
        assert_eq!(map.get(APPLE), Some(Delta::Adjust(4)));
        assert_eq!(map.effective_quantity(APPLE, 1), 5);
    }

    #[test]
    fn test_effective_quantity_clamps_at_zero() {
        let mut map = DeltaMap::new();
        map.adjust(APPLE, -5);
        assert_eq!(map.effective_quantity(APPLE, 2), 0);
    }

    #[test]
    fn test_force_zero_wins_over_server_quantity() {
        let mut map = DeltaMap::new();
        map.force_zero(APPLE);
        assert_eq!(map.effective_quantity(APPLE, 0), 0);
        assert_eq!(map.effective_quantity(APPLE, 99), 0);
    }

    #[test]
    fn test_force_zero_absorbs_later_adjustments() {
        let mut map = DeltaMap::new();
        map.force_zero(APPLE);
        map.adjust(APPLE, 3);
        assert_eq!(map.get(APPLE), Some(Delta::ForceZero));
        assert_eq!(map.effective_quantity(APPLE, 10), 0);
    }

    #[test]
    fn test_force_zero_absorbs_earlier_adjustments() {
        let mut map = DeltaMap::new();
        map.adjust(APPLE, 3);
        map.force_zero(APPLE);
        assert_eq!(map.get(APPLE), Some(Delta::ForceZero));
    }

    #[test]
    fn test_products_are_independent() {
        let mut map = DeltaMap::new();
        map.adjust(APPLE, 1);
        map.force_zero(BREAD);
        assert_eq!(map.effective_quantity(APPLE, 1), 2);
        assert_eq!(map.effective_quantity(BREAD, 4), 0);
    }

    #[test]
    fn test_unknown_product_passes_server_quantity_through() {
        let map = DeltaMap::new();
        assert_eq!(map.effective_quantity(APPLE, 7), 7);
    }

    #[test]
    fn test_clear() {
        let mut map = DeltaMap::new();
        map.adjust(APPLE, 1);
        map.force_zero(BREAD);
        assert!(!map.is_empty());
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.effective_quantity(BREAD, 4), 4);
    }
}
