//! # farm-id
//!
//! Stable ID types, parsing, and validation for farm entities.
//!
//! ## Design Principles
//!
//! - IDs are system-generated; barn names are human labels and never used for lookup
//! - All IDs have a canonical string representation with strict parsing
//! - IDs are typed so an animal ID can never be passed where a barn ID is expected
//!
//! ## ID Format
//!
//! All IDs use a prefixed format: `{prefix}_{ulid}`
//!
//! Examples:
//! - `anml_01HV4Z2WQXKJNM8GPQY6VBKC3D`
//! - `barn_01HV4Z3MXNKPQR9HSTZ7WCLD4E`

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
