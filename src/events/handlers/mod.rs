// src/events/handlers/mod.rs
//
// Event handlers and their registration.

pub mod category_handler;
pub mod mix_category_handler;

use std::sync::Arc;

pub use category_handler::CategoryEventHandler;
pub use mix_category_handler::MixCategoryEventHandler;

use crate::error::AppResult;
use crate::events::bus::HandlerRegistry;
use crate::events::types::{
    CategoryCreated, CategoryDeleted, CategoryUpdated, MixCategoryCreated, MixCategoryDeleted,
    MixCategoryUpdated,
};
use crate::services::DataMixturer;

/// Registry wiring both event streams to the mixturer
pub fn build_sync_registry(mixturer: Arc<DataMixturer>) -> AppResult<HandlerRegistry> {
    let for_categories = Arc::clone(&mixturer);
    let for_documents = mixturer;

    let registry = HandlerRegistry::builder()
        .factory(move || CategoryEventHandler::new(Arc::clone(&for_categories)))
        .factory(move || MixCategoryEventHandler::new(Arc::clone(&for_documents)))
        .subscribe::<CategoryCreated, CategoryEventHandler>()
        .subscribe::<CategoryUpdated, CategoryEventHandler>()
        .subscribe::<CategoryDeleted, CategoryEventHandler>()
        .subscribe::<MixCategoryCreated, MixCategoryEventHandler>()
        .subscribe::<MixCategoryUpdated, MixCategoryEventHandler>()
        .subscribe::<MixCategoryDeleted, MixCategoryEventHandler>()
        .build()?;

    log::info!("[SYNC] Category sync handlers registered");
    Ok(registry)
}
