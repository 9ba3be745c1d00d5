//! Placement and eviction of animals.
//!
//! Each call reads the color's animals and barns from the store, decides
//! with the [`Balancer`] whether the barn set must grow or shrink, and writes
//! the result back. Nothing is cached between calls.
//!
//! A store failure aborts the call at the failing step. Writes that already
//! happened are not compensated; the store's transaction boundary decides
//! whether anyone else can observe them.

use std::collections::HashMap;

use farm_id::{AnimalId, BarnId};
use tracing::{debug, info, instrument, warn};

use crate::balancer::Balancer;
use crate::capacity::BarnCapacity;
use crate::distributor::{barn_index, distribute};
use crate::error::{FarmError, FarmResult};
use crate::model::{Animal, Barn, Color};
use crate::report::PartitionReport;
use crate::store::{CreationOrder, PartitionStore};

/// What an eviction did to the color's barns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictOutcome {
    /// The animal was not stored; nothing changed.
    Missing,
    /// The animal was removed and the barns needed no change.
    Removed,
    /// The last animal of the color left; its barns were deleted.
    Emptied { barns_removed: usize },
    /// The newest barn was retired and the rest of the color redistributed.
    BarnRetired { barn: BarnId, moved: usize },
    /// One animal moved from the fullest to the emptiest barn.
    Rebalanced {
        animal: AnimalId,
        from: BarnId,
        to: BarnId,
    },
}

/// Places and evicts animals while keeping every color's barns balanced.
///
/// Calls for the same color must not overlap; see the crate docs.
pub struct PartitionService<S> {
    store: S,
    balancer: Balancer,
}

impl<S: PartitionStore> PartitionService<S> {
    pub fn new(store: S, capacity: BarnCapacity) -> Self {
        Self {
            store,
            balancer: Balancer::new(capacity),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn capacity(&self) -> BarnCapacity {
        self.balancer.capacity()
    }

    /// Every stored animal.
    pub async fn find_all(&self) -> FarmResult<Vec<Animal>> {
        Ok(self.store.find_all_animals().await?)
    }

    /// Deletes every animal, then every barn left behind.
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> FarmResult<()> {
        self.store.delete_all_animals().await?;
        for color in self.store.colors_in_use().await? {
            let barns = self
                .store
                .find_barns_by_color(color, CreationOrder::Ascending)
                .await?;
            for barn in &barns {
                self.store.delete_barn(barn.id).await?;
            }
        }
        info!("Deleted all animals and barns");
        Ok(())
    }

    /// Puts an animal into a barn of its favorite color and saves it.
    ///
    /// Creates a barn when the color's barns cannot take one more animal
    /// without exceeding capacity, redistributing the color's existing
    /// animals over the enlarged set. Otherwise the animal joins the least
    /// loaded barn. Placing an animal that is already stored moves it as if
    /// it were new. A stored animal cannot change color: re-placing it under
    /// another color is rejected before anything is written.
    #[instrument(skip(self, animal), fields(animal_id = %animal.id, color = %animal.favorite_color))]
    pub async fn place(&self, mut animal: Animal) -> FarmResult<Animal> {
        let color = animal.favorite_color;
        if let Some(stored) = self.store.find_animal(animal.id).await? {
            if stored.favorite_color != color {
                return Err(FarmError::Invariant(format!(
                    "animal {} is stored as {}, cannot re-place it as {color}",
                    animal.id, stored.favorite_color
                )));
            }
        }
        let mut existing = self.store.find_animals_by_color(color).await?;
        existing.retain(|a| a.id != animal.id);
        let mut barns = self
            .store
            .find_barns_by_color(color, CreationOrder::Ascending)
            .await?;

        if barns.is_empty() {
            let barn = self.store.save_barn(&Barn::for_color(color, 0)).await?;
            info!(barn = %barn.name, barn_id = %barn.id, "Created first barn");
            animal.barn = Some(barn.id);
        } else if self.balancer.growth_needed(existing.len(), barns.len()) {
            let barn = self
                .store
                .save_barn(&Barn::for_color(color, barns.len()))
                .await?;
            info!(
                barn = %barn.name,
                barn_id = %barn.id,
                existing = existing.len(),
                barns = barns.len() + 1,
                "Created barn, redistributing"
            );
            barns.push(barn);

            let moved = distribute(&self.store, &mut existing, &barns).await?;
            let target = &barns[barn_index(existing.len(), barns.len())];
            debug!(moved, barn = %target.name, "Redistribution complete");
            animal.barn = Some(target.id);
        } else {
            let loads = barn_loads(&existing, &barns);
            let (target, load) = least_loaded(&loads).ok_or_else(|| {
                FarmError::Invariant(format!("no barn loads computed for {color}"))
            })?;
            debug!(barn_id = %target, load, "Joining least loaded barn");
            animal.barn = Some(target);
        }

        Ok(self.store.save_animal(&animal).await?)
    }

    /// Places each animal in turn. Stops at the first failure; animals
    /// placed before it stay placed.
    pub async fn place_all(&self, animals: Vec<Animal>) -> FarmResult<Vec<Animal>> {
        let mut placed = Vec::with_capacity(animals.len());
        for animal in animals {
            placed.push(self.place(animal).await?);
        }
        Ok(placed)
    }

    /// Removes an animal and restores the barn invariants for its color.
    ///
    /// The stored record decides which color is rebalanced; only the id of
    /// `animal` is used. Unknown animals are ignored. When the color empties,
    /// its barns are deleted. When the remaining count lands on a capacity
    /// boundary the newest barn is retired and the rest redistributed.
    /// Otherwise at most one animal moves from the fullest to the emptiest
    /// barn.
    #[instrument(skip(self, animal), fields(animal_id = %animal.id, color = %animal.favorite_color))]
    pub async fn evict(&self, animal: &Animal) -> FarmResult<EvictOutcome> {
        let Some(stored) = self.store.find_animal(animal.id).await? else {
            debug!("Animal not stored, nothing to evict");
            return Ok(EvictOutcome::Missing);
        };
        if stored.favorite_color != animal.favorite_color {
            warn!(stored_color = %stored.favorite_color, "Evicting from stored color");
        }

        self.store.delete_animal(stored.id).await?;

        let color = stored.favorite_color;
        let mut remaining = self.store.find_animals_by_color(color).await?;

        if remaining.is_empty() {
            let barns = self
                .store
                .find_barns_by_color(color, CreationOrder::Ascending)
                .await?;
            for barn in &barns {
                self.store.delete_barn(barn.id).await?;
            }
            info!(barns_removed = barns.len(), "Last animal left, barns deleted");
            return Ok(EvictOutcome::Emptied {
                barns_removed: barns.len(),
            });
        }

        if self.balancer.shrink_needed(remaining.len()) {
            let mut barns = self
                .store
                .find_barns_by_color(color, CreationOrder::Descending)
                .await?;
            if barns.is_empty() {
                return Err(FarmError::Invariant(format!(
                    "{} {color} animals remain but no barns exist",
                    remaining.len()
                )));
            }
            let retired = barns.remove(0);

            let moved = distribute(&self.store, &mut remaining, &barns).await?;
            self.store.delete_barn(retired.id).await?;
            info!(
                barn = %retired.name,
                barn_id = %retired.id,
                remaining = remaining.len(),
                moved,
                "Retired newest barn"
            );
            return Ok(EvictOutcome::BarnRetired {
                barn: retired.id,
                moved,
            });
        }

        let barns = self
            .store
            .find_barns_by_color(color, CreationOrder::Ascending)
            .await?;
        let loads = barn_loads(&remaining, &barns);
        let (Some((to, min)), Some((from, max))) = (least_loaded(&loads), most_loaded(&loads))
        else {
            return Err(FarmError::Invariant(format!(
                "{} {color} animals remain but no barns exist",
                remaining.len()
            )));
        };

        if !self.balancer.rebalance_needed(min, max) {
            debug!(min, max, "Loads within tolerance");
            return Ok(EvictOutcome::Removed);
        }

        let mover = remaining
            .iter_mut()
            .find(|a| a.is_in(&from))
            .ok_or_else(|| FarmError::Invariant(format!("barn {from} has load {max} but no animals")))?;
        mover.barn = Some(to);
        self.store.save_animal(mover).await?;
        info!(
            moved_animal = %mover.id,
            from = %from,
            to = %to,
            min,
            max,
            "Moved one animal to rebalance"
        );

        Ok(EvictOutcome::Rebalanced {
            animal: mover.id,
            from,
            to,
        })
    }

    /// Evicts each animal in turn against its stored record. Stops at the
    /// first failure.
    pub async fn evict_all(&self, animals: &[Animal]) -> FarmResult<Vec<EvictOutcome>> {
        let mut outcomes = Vec::with_capacity(animals.len());
        for animal in animals {
            outcomes.push(self.evict(animal).await?);
        }
        Ok(outcomes)
    }

    /// Audits one color without changing anything.
    pub async fn inspect(&self, color: Color) -> FarmResult<PartitionReport> {
        let animals = self.store.find_animals_by_color(color).await?;
        let barns = self
            .store
            .find_barns_by_color(color, CreationOrder::Ascending)
            .await?;
        Ok(PartitionReport::build(
            color,
            self.capacity(),
            &animals,
            &barns,
        ))
    }

    /// Audits every color that has animals or barns.
    pub async fn inspect_all(&self) -> FarmResult<Vec<PartitionReport>> {
        let mut reports = Vec::new();
        for color in self.store.colors_in_use().await? {
            reports.push(self.inspect(color).await?);
        }
        Ok(reports)
    }
}

/// Per-barn animal counts, in the order of `barns`. Barns without animals
/// count as zero; animals in barns outside `barns` are ignored.
fn barn_loads(animals: &[Animal], barns: &[Barn]) -> Vec<(BarnId, usize)> {
    let mut counts: HashMap<BarnId, usize> = HashMap::with_capacity(barns.len());
    for barn_id in animals.iter().filter_map(|a| a.barn) {
        *counts.entry(barn_id).or_default() += 1;
    }
    barns
        .iter()
        .map(|b| (b.id, counts.get(&b.id).copied().unwrap_or(0)))
        .collect()
}

/// First barn with the smallest load.
fn least_loaded(loads: &[(BarnId, usize)]) -> Option<(BarnId, usize)> {
    loads.iter().copied().min_by_key(|&(_, load)| load)
}

/// First barn with the largest load.
fn most_loaded(loads: &[(BarnId, usize)]) -> Option<(BarnId, usize)> {
    loads
        .iter()
        .copied()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
}
