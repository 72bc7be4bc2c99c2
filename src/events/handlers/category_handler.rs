// src/events/handlers/category_handler.rs
//
// Binds write-model category events to the data mixturer.
// No business logic here; errors propagate back through the bus.

use std::sync::Arc;

use crate::error::AppResult;
use crate::events::bus::EventHandler;
use crate::events::types::{CategoryCreated, CategoryDeleted, CategoryUpdated};
use crate::services::DataMixturer;

pub struct CategoryEventHandler {
    mixturer: Arc<DataMixturer>,
}

impl CategoryEventHandler {
    pub fn new(mixturer: Arc<DataMixturer>) -> Self {
        Self { mixturer }
    }
}

impl EventHandler<CategoryCreated> for CategoryEventHandler {
    fn handle(&self, event: &CategoryCreated) -> AppResult<()> {
        log::debug!("[SYNC] CategoryCreated: id={}", event.category.id);
        self.mixturer.on_category_created(&event.category)
    }
}

impl EventHandler<CategoryUpdated> for CategoryEventHandler {
    fn handle(&self, event: &CategoryUpdated) -> AppResult<()> {
        log::debug!("[SYNC] CategoryUpdated: id={}", event.category.id);
        let moved_from = event.is_move().then_some(event.previous_parent_id);
        self.mixturer.on_category_updated(&event.category, moved_from)
    }
}

impl EventHandler<CategoryDeleted> for CategoryEventHandler {
    fn handle(&self, event: &CategoryDeleted) -> AppResult<()> {
        log::debug!("[SYNC] CategoryDeleted: id={}", event.category.id);
        self.mixturer.on_category_deleted(&event.category)
    }
}
