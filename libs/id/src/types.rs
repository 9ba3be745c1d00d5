//! Typed ID definitions for farm entities.

use crate::define_id;

define_id!(AnimalId, "anml");
define_id!(BarnId, "barn");
