// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod category_service;
pub mod data_mixturer;
pub mod dependency_resolver;
pub mod mix_category_service;


pub use category_service::{
    BreadcrumbTarget, CategoryService, CreateCategoryRequest, UpdateCategoryRequest,
    BREADCRUMB_SEPARATOR,
};

pub use data_mixturer::DataMixturer;

pub use dependency_resolver::{CategoryDependencyResolver, DependencyResolver};

pub use mix_category_service::MixCategoryService;
