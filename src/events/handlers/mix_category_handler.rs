// src/events/handlers/mix_category_handler.rs
//
// Binds document events back to the data mixturer, closing the loop:
// a document change refreshes the parent's children, whose own update
// comes back through here one level higher.

use std::sync::Arc;

use crate::error::AppResult;
use crate::events::bus::EventHandler;
use crate::events::types::{MixCategoryCreated, MixCategoryDeleted, MixCategoryUpdated};
use crate::services::DataMixturer;

pub struct MixCategoryEventHandler {
    mixturer: Arc<DataMixturer>,
}

impl MixCategoryEventHandler {
    pub fn new(mixturer: Arc<DataMixturer>) -> Self {
        Self { mixturer }
    }
}

impl EventHandler<MixCategoryCreated> for MixCategoryEventHandler {
    fn handle(&self, event: &MixCategoryCreated) -> AppResult<()> {
        self.mixturer.on_document_changed(&event.document)
    }
}

impl EventHandler<MixCategoryUpdated> for MixCategoryEventHandler {
    fn handle(&self, event: &MixCategoryUpdated) -> AppResult<()> {
        self.mixturer.on_document_changed(&event.document)
    }
}

impl EventHandler<MixCategoryDeleted> for MixCategoryEventHandler {
    fn handle(&self, event: &MixCategoryDeleted) -> AppResult<()> {
        self.mixturer.on_document_changed(&event.document)
    }
}
