//! The persistence contract the placement service relies on.
//!
//! Implementations must give read-after-write visibility within one
//! placement call and must report entities in creation order. Transaction
//! boundaries, retries and timeouts are the implementation's concern.

use async_trait::async_trait;
use farm_id::{AnimalId, BarnId};

use crate::error::StoreResult;
use crate::model::{Animal, Barn, Color};

/// Ordering of barns by when they were first saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationOrder {
    Ascending,
    Descending,
}

/// Durable storage for animals and barns.
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Animals of one color, oldest first.
    async fn find_animals_by_color(&self, color: Color) -> StoreResult<Vec<Animal>>;

    /// Barns of one color in the requested creation order.
    async fn find_barns_by_color(
        &self,
        color: Color,
        order: CreationOrder,
    ) -> StoreResult<Vec<Barn>>;

    /// Inserts or updates an animal. Updating keeps its creation position.
    async fn save_animal(&self, animal: &Animal) -> StoreResult<Animal>;

    /// Inserts or updates a barn. Updating keeps its creation position.
    async fn save_barn(&self, barn: &Barn) -> StoreResult<Barn>;

    /// Deletes an animal. Deleting an unknown ID is not an error.
    async fn delete_animal(&self, id: AnimalId) -> StoreResult<()>;

    /// Deletes a barn. Deleting an unknown ID is not an error.
    async fn delete_barn(&self, id: BarnId) -> StoreResult<()>;

    async fn animal_exists(&self, id: AnimalId) -> StoreResult<bool>;

    async fn find_animal(&self, id: AnimalId) -> StoreResult<Option<Animal>>;

    /// Every animal, oldest first.
    async fn find_all_animals(&self) -> StoreResult<Vec<Animal>>;

    /// Deletes every animal without touching barns.
    async fn delete_all_animals(&self) -> StoreResult<()>;

    /// Colors that currently have at least one animal or barn.
    async fn colors_in_use(&self) -> StoreResult<Vec<Color>>;
}
