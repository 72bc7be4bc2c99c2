pub mod entity;
pub mod invariants;

pub use entity::{Category, ROOT_PARENT_ID};
pub use invariants::validate_category;
