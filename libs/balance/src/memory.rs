//! In-memory [`PartitionStore`].
//!
//! Creation order is insertion order. Useful for tests and for embedding
//! the placement service without a database. Writes can be made to fail
//! after a budget is spent, which is how partial-failure behavior is tested.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use farm_id::{AnimalId, BarnId};

use crate::error::{StoreError, StoreResult};
use crate::model::{Animal, Barn, Color};
use crate::store::{CreationOrder, PartitionStore};

#[derive(Debug, Default)]
struct Inner {
    animals: Vec<Animal>,
    barns: Vec<Barn>,
    /// Remaining successful writes before every write fails.
    write_budget: Option<usize>,
}

impl Inner {
    fn charge_write(&mut self) -> StoreResult<()> {
        match self.write_budget {
            Some(0) => Err(StoreError::Unavailable("write budget exhausted".to_string())),
            Some(n) => {
                self.write_budget = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the next `writes` writes succeed and fails every write after.
    pub fn fail_writes_after(&self, writes: usize) -> StoreResult<()> {
        self.lock()?.write_budget = Some(writes);
        Ok(())
    }

    /// Removes any write budget set by [`Self::fail_writes_after`].
    pub fn heal(&self) -> StoreResult<()> {
        self.lock()?.write_budget = None;
        Ok(())
    }

    /// Every barn of every color, oldest first.
    pub fn all_barns(&self) -> StoreResult<Vec<Barn>> {
        Ok(self.lock()?.barns.clone())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PartitionStore for MemoryStore {
    async fn find_animals_by_color(&self, color: Color) -> StoreResult<Vec<Animal>> {
        let inner = self.lock()?;
        Ok(inner
            .animals
            .iter()
            .filter(|a| a.favorite_color == color)
            .cloned()
            .collect())
    }

    async fn find_barns_by_color(
        &self,
        color: Color,
        order: CreationOrder,
    ) -> StoreResult<Vec<Barn>> {
        let inner = self.lock()?;
        let mut barns: Vec<Barn> = inner
            .barns
            .iter()
            .filter(|b| b.color == color)
            .cloned()
            .collect();
        if order == CreationOrder::Descending {
            barns.reverse();
        }
        Ok(barns)
    }

    async fn save_animal(&self, animal: &Animal) -> StoreResult<Animal> {
        let mut inner = self.lock()?;
        inner.charge_write()?;
        match inner.animals.iter().position(|a| a.id == animal.id) {
            Some(i) => inner.animals[i] = animal.clone(),
            None => inner.animals.push(animal.clone()),
        }
        Ok(animal.clone())
    }

    async fn save_barn(&self, barn: &Barn) -> StoreResult<Barn> {
        let mut inner = self.lock()?;
        inner.charge_write()?;
        match inner.barns.iter().position(|b| b.id == barn.id) {
            Some(i) => inner.barns[i] = barn.clone(),
            None => inner.barns.push(barn.clone()),
        }
        Ok(barn.clone())
    }

    async fn delete_animal(&self, id: AnimalId) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.charge_write()?;
        inner.animals.retain(|a| a.id != id);
        Ok(())
    }

    async fn delete_barn(&self, id: BarnId) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.charge_write()?;
        inner.barns.retain(|b| b.id != id);
        Ok(())
    }

    async fn animal_exists(&self, id: AnimalId) -> StoreResult<bool> {
        Ok(self.lock()?.animals.iter().any(|a| a.id == id))
    }

    async fn find_animal(&self, id: AnimalId) -> StoreResult<Option<Animal>> {
        Ok(self.lock()?.animals.iter().find(|a| a.id == id).cloned())
    }

    async fn find_all_animals(&self) -> StoreResult<Vec<Animal>> {
        Ok(self.lock()?.animals.clone())
    }

    async fn delete_all_animals(&self) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.charge_write()?;
        inner.animals.clear();
        Ok(())
    }

    async fn colors_in_use(&self) -> StoreResult<Vec<Color>> {
        let inner = self.lock()?;
        Ok(Color::ALL
            .into_iter()
            .filter(|c| {
                inner.animals.iter().any(|a| a.favorite_color == *c)
                    || inner.barns.iter().any(|b| b.color == *c)
            })
            .collect())
    }
}
