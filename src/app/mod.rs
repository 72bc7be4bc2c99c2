// src/app/mod.rs
//
// Composition root.
//
// Wiring order:
// 1. Infrastructure (pool, schema, bus)
// 2. Repositories
// 3. Services
// 4. Handler registry, installed on the bus
//
// `CatalogSync` holds the only strong reference to the bus. Services publish
// through weak handles, so dropping `CatalogSync` releases everything.

use std::sync::Arc;

use crate::db::{create_connection_pool, create_memory_pool, get_connection, initialize_database};
use crate::db::ConnectionPool;
use crate::error::AppResult;
use crate::events::{build_sync_registry, EventBus, EventPublisher};
use crate::repositories::{
    CategoryRepository, MixCategoryRepository, SqliteCategoryRepository,
    SqliteMixCategoryRepository,
};
use crate::services::{
    CategoryDependencyResolver, CategoryService, DataMixturer, DependencyResolver,
    MixCategoryService,
};
use crate::settings::CatalogConfig;

pub struct CatalogSync {
    pub event_bus: Arc<EventBus>,
    pub category_service: Arc<CategoryService>,
    pub mix_service: Arc<MixCategoryService>,
    pub resolver: Arc<CategoryDependencyResolver>,
    pub mixturer: Arc<DataMixturer>,
}

impl CatalogSync {
    /// Build against the configured database file
    pub fn open(config: &CatalogConfig) -> AppResult<Self> {
        let pool = create_connection_pool(&config.database)?;
        Self::with_pool(Arc::new(pool), config)
    }

    /// Build against a private in-memory database
    pub fn in_memory(config: &CatalogConfig) -> AppResult<Self> {
        Self::with_pool(Arc::new(create_memory_pool()?), config)
    }

    pub fn with_pool(pool: Arc<ConnectionPool>, config: &CatalogConfig) -> AppResult<Self> {
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }

        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(Arc::clone(&pool)));
        let document_repo: Arc<dyn MixCategoryRepository> = Arc::new(
            SqliteMixCategoryRepository::new(Arc::clone(&pool), &config.documents)?,
        );

        Self::with_repositories(category_repo, document_repo, config)
    }

    /// Build over arbitrary repository implementations
    pub fn with_repositories(
        category_repo: Arc<dyn CategoryRepository>,
        document_repo: Arc<dyn MixCategoryRepository>,
        config: &CatalogConfig,
    ) -> AppResult<Self> {
        let event_bus = Arc::new(EventBus::new(config.cascade));
        let publisher = EventPublisher::new(&event_bus);

        let category_service = Arc::new(CategoryService::new(
            category_repo,
            publisher.clone(),
            config.breadcrumb,
        ));
        let mix_service = Arc::new(MixCategoryService::new(document_repo, publisher));
        let resolver = Arc::new(CategoryDependencyResolver::new(
            Arc::clone(&category_service),
            Arc::clone(&mix_service),
            config.breadcrumb,
        ));
        let mixturer = Arc::new(DataMixturer::new(
            Arc::clone(&resolver) as Arc<dyn DependencyResolver>
        ));

        event_bus.install(build_sync_registry(Arc::clone(&mixturer))?)?;

        Ok(Self {
            event_bus,
            category_service,
            mix_service,
            resolver,
            mixturer,
        })
    }
}
