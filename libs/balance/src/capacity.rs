//! Per-barn capacity shared by every color.

use std::num::NonZeroUsize;

/// The number of animals a barn is sized for.
///
/// Every sizing decision in the balancer and distributor reads this value.
/// A barn may briefly exceed it only while a rebalance is pending inside a
/// single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarnCapacity(NonZeroUsize);

impl BarnCapacity {
    /// The capacity used when nothing else is configured.
    pub const DEFAULT: Self = Self(match NonZeroUsize::new(20) {
        Some(n) => n,
        None => unreachable!(),
    });

    /// Creates a capacity, returning `None` for zero.
    #[must_use]
    pub const fn new(capacity: usize) -> Option<Self> {
        match NonZeroUsize::new(capacity) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0.get()
    }

    /// Number of barns a color needs to hold `animals` animals.
    #[must_use]
    pub const fn barns_for(&self, animals: usize) -> usize {
        animals.div_ceil(self.0.get())
    }
}

impl Default for BarnCapacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for BarnCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_twenty() {
        assert_eq!(BarnCapacity::default().get(), 20);
    }

    #[test]
    fn test_zero_rejected() {
        assert!(BarnCapacity::new(0).is_none());
    }

    #[test]
    fn test_barns_for() {
        let capacity = BarnCapacity::DEFAULT;
        assert_eq!(capacity.barns_for(0), 0);
        assert_eq!(capacity.barns_for(1), 1);
        assert_eq!(capacity.barns_for(20), 1);
        assert_eq!(capacity.barns_for(21), 2);
        assert_eq!(capacity.barns_for(40), 2);
        assert_eq!(capacity.barns_for(41), 3);
    }
}
