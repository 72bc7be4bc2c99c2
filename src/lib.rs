// src/lib.rs
// CatalogMix - Category read-model synchronization
//
// Architecture:
// - Write model: categories, owned by CategoryService
// - Read model: one denormalized document per visible category
// - Event-driven: every write publishes an event; handlers keep the
//   documents (and their children and breadcrumbs) in step
// - Synchronous: a command returns once its whole cascade has run

// ============================================================================
// MODULES
// ============================================================================

pub mod app;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod settings;

// ============================================================================
// PUBLIC API - Composition
// ============================================================================

pub use app::CatalogSync;

pub use settings::{BreadcrumbConfig, CascadeConfig, CatalogConfig, CollectionConfig, DatabaseConfig};

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{validate_category, Category, DocumentId, MixCategory, ROOT_PARENT_ID};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    build_sync_registry,
    // Write model events
    CategoryCreated,
    CategoryDeleted,
    CategoryUpdated,
    DomainEvent,
    EventBus,
    EventHandler,
    EventLogEntry,
    EventPublisher,
    HandlerRegistry,
    // Read model events
    MixCategoryCreated,
    MixCategoryDeleted,
    MixCategoryUpdated,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CategoryRepository, MixCategoryRepository, SqliteCategoryRepository,
    SqliteMixCategoryRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    BreadcrumbTarget,
    CategoryDependencyResolver,
    // Category Service
    CategoryService,
    CreateCategoryRequest,
    // Data Mixturer
    DataMixturer,
    DependencyResolver,
    // Document Service
    MixCategoryService,
    UpdateCategoryRequest,
    BREADCRUMB_SEPARATOR,
};
