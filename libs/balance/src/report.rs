//! Read-only audit of a color's barns against the balancing invariants.

use chrono::{DateTime, Utc};
use farm_id::{AnimalId, BarnId};
use serde::Serialize;

use crate::capacity::BarnCapacity;
use crate::model::{Animal, Barn, Color};

/// Load of one barn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarnLoad {
    pub barn_id: BarnId,
    pub name: String,
    pub animals: usize,
}

/// A broken invariant found by an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Animal points at a barn that is missing or belongs to another color.
    ForeignAnimal { animal_id: AnimalId, barn_id: BarnId },
    /// Animal has never been placed.
    Unassigned { animal_id: AnimalId },
    /// Barn count differs from `ceil(animals / capacity)`.
    BarnCount { expected: usize, actual: usize },
    /// Loads differ by more than one.
    Imbalance { min: usize, max: usize },
    /// Barn holds no animals.
    EmptyBarn { barn_id: BarnId },
}

/// Snapshot of one color's placement state.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionReport {
    pub color: Color,
    pub animals: usize,
    pub expected_barns: usize,
    /// Barns in creation order.
    pub loads: Vec<BarnLoad>,
    pub violations: Vec<Violation>,
    pub checked_at: DateTime<Utc>,
}

impl PartitionReport {
    /// Builds a report from the animals and barns (creation order) of `color`.
    pub fn build(color: Color, capacity: BarnCapacity, animals: &[Animal], barns: &[Barn]) -> Self {
        let mut loads: Vec<BarnLoad> = barns
            .iter()
            .map(|b| BarnLoad {
                barn_id: b.id,
                name: b.name.clone(),
                animals: 0,
            })
            .collect();
        let mut violations = Vec::new();

        for animal in animals {
            match animal.barn {
                None => violations.push(Violation::Unassigned {
                    animal_id: animal.id,
                }),
                Some(barn_id) => match loads.iter_mut().find(|l| l.barn_id == barn_id) {
                    Some(load) => load.animals += 1,
                    None => violations.push(Violation::ForeignAnimal {
                        animal_id: animal.id,
                        barn_id,
                    }),
                },
            }
        }

        let expected_barns = capacity.barns_for(animals.len());
        if barns.len() != expected_barns {
            violations.push(Violation::BarnCount {
                expected: expected_barns,
                actual: barns.len(),
            });
        }

        let min = loads.iter().map(|l| l.animals).min();
        let max = loads.iter().map(|l| l.animals).max();
        if let (Some(min), Some(max)) = (min, max) {
            if max - min > 1 {
                violations.push(Violation::Imbalance { min, max });
            }
        }

        violations.extend(
            loads
                .iter()
                .filter(|l| l.animals == 0)
                .map(|l| Violation::EmptyBarn { barn_id: l.barn_id }),
        );

        Self {
            color,
            animals: animals.len(),
            expected_barns,
            loads,
            violations,
            checked_at: Utc::now(),
        }
    }

    /// True when no invariant is broken.
    pub fn is_balanced(&self) -> bool {
        self.violations.is_empty()
    }

    /// Spread between the fullest and emptiest barn.
    pub fn spread(&self) -> usize {
        let min = self.loads.iter().map(|l| l.animals).min().unwrap_or(0);
        let max = self.loads.iter().map(|l| l.animals).max().unwrap_or(0);
        max - min
    }
}
