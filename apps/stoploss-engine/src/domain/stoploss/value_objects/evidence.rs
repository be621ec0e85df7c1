//! Evidence Set Value Object

use rust_decimal::Decimal;

/// Multiset of prices awaiting confirmation by a delayed check.
///
/// Every intervening price tick pushes one entry; each delayed check pops the
/// entry for its own price once it resolves. Duplicate prices from distinct
/// ticks are distinct entries. The `all_*` predicates are vacuously true on
/// an empty set, which makes a check with no intervening ticks fire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceSet(Vec<Decimal>);

impl EvidenceSet {
    /// Create an empty evidence set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a price observation.
    pub fn push(&mut self, price: Decimal) {
        self.0.push(price);
    }

    /// Remove one occurrence of `price`, if present.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, price: Decimal) -> bool {
        if let Some(index) = self.0.iter().position(|p| *p == price) {
            self.0.remove(index);
            true
        } else {
            false
        }
    }

    /// Check whether every pending price is strictly below `threshold`.
    #[must_use]
    pub fn all_below(&self, threshold: Decimal) -> bool {
        self.0.iter().all(|p| *p < threshold)
    }

    /// Check whether every pending price is at or above `threshold`.
    #[must_use]
    pub fn all_at_or_above(&self, threshold: Decimal) -> bool {
        self.0.iter().all(|p| *p >= threshold)
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no entries are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
