//! Barn placement and rebalancing.
//!
//! Animals are grouped into barns by favorite color. Every color forms an
//! independent partition whose state is derived from the store on demand:
//! there is no partition record, only the animals and barns that share a color.
//!
//! # Invariants
//!
//! After every completed [`PartitionService::place`] or
//! [`PartitionService::evict`] call, for each color with `N` animals:
//!
//! - every animal sits in a barn of its own color
//! - the color has exactly `ceil(N / C)` barns (none when `N == 0`)
//! - barn loads differ by at most one
//! - no empty barn survives
//!
//! `C` is the configured [`BarnCapacity`].
//!
//! Callers must serialize writers per color. Different colors never share
//! state and may be processed concurrently.

pub mod balancer;
pub mod capacity;
pub mod distributor;
mod error;
pub mod memory;
pub mod model;
pub mod report;
pub mod service;
pub mod store;

pub use capacity::BarnCapacity;
pub use error::{FarmError, FarmResult, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use model::{Animal, Barn, Color, ParseColorError};
pub use report::{BarnLoad, PartitionReport, Violation};
pub use service::{EvictOutcome, PartitionService};
pub use store::{CreationOrder, PartitionStore};
