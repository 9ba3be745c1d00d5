//! Round-robin redistribution of a color's animals over its barns.

use tracing::debug;

use crate::error::{FarmError, FarmResult};
use crate::model::{Animal, Barn};
use crate::store::PartitionStore;

/// Index of the barn that receives the animal at `position`.
#[must_use]
pub fn barn_index(position: usize, barns: usize) -> usize {
    position % barns
}

/// Assigns `animals[i]` to `barns[i % barns.len()]` and saves every animal.
///
/// Every animal is written, changed or not, so no earlier assignment
/// survives the call. The result depends only on the order of both slices,
/// which callers keep in creation order. Store failures abort immediately;
/// animals saved before the failure stay saved.
///
/// Returns how many animals changed barn.
pub async fn distribute<S>(store: &S, animals: &mut [Animal], barns: &[Barn]) -> FarmResult<usize>
where
    S: PartitionStore + ?Sized,
{
    if barns.is_empty() {
        return Err(FarmError::Invariant(format!(
            "cannot distribute {} animals over zero barns",
            animals.len()
        )));
    }

    let mut moved = 0;
    for (position, animal) in animals.iter_mut().enumerate() {
        let barn = &barns[barn_index(position, barns.len())];
        if barn.color != animal.favorite_color {
            return Err(FarmError::Invariant(format!(
                "animal {} ({}) cannot live in barn {} ({})",
                animal.id, animal.favorite_color, barn.name, barn.color
            )));
        }
        if !animal.is_in(&barn.id) {
            moved += 1;
        }
        animal.barn = Some(barn.id);
        store.save_animal(animal).await?;
    }

    debug!(
        animals = animals.len(),
        barns = barns.len(),
        moved,
        "Distributed animals"
    );

    Ok(moved)
}
