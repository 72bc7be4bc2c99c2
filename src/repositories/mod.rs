// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only

pub mod category_repository;
pub mod mix_category_repository;

pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use mix_category_repository::{MixCategoryRepository, SqliteMixCategoryRepository};

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use mix_category_repository::MockMixCategoryRepository;
