pub mod entity;

pub use entity::{DocumentId, MixCategory};
