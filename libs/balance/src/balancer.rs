//! Structural decisions: when a color gains a barn, loses one, or needs a
//! single animal moved.

use crate::capacity::BarnCapacity;

/// Decides barn creation, barn retirement, and single-animal moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Balancer {
    capacity: BarnCapacity,
}

impl Balancer {
    pub fn new(capacity: BarnCapacity) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> BarnCapacity {
        self.capacity
    }

    /// Whether placing one more animal requires a new barn.
    ///
    /// `existing` is the number of animals of the color before the insertion
    /// and `barns` the number of barns on hand. Uses floor division so the
    /// answer is correct even if earlier calls left too few barns.
    #[must_use]
    pub fn growth_needed(&self, existing: usize, barns: usize) -> bool {
        existing / self.capacity.get() + 1 > barns
    }

    /// Whether a removal that left `remaining` animals requires retiring
    /// exactly one barn.
    #[must_use]
    pub fn shrink_needed(&self, remaining: usize) -> bool {
        remaining > 0 && remaining % self.capacity.get() == 0
    }

    /// Whether loads have drifted more than one apart.
    #[must_use]
    pub fn rebalance_needed(&self, min_load: usize, max_load: usize) -> bool {
        max_load.saturating_sub(min_load) > 1
    }
}
