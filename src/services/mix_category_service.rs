// src/services/mix_category_service.rs
//
// The only writer of MixCategory documents.
//
// Every write that changes the store is followed, in the same call, by the
// matching document event. Those events re-enter the data mixturer and drive
// propagation up the ancestor chain.

use std::sync::Arc;

use crate::domain::{DocumentId, MixCategory};
use crate::error::{AppError, AppResult};
use crate::events::{EventPublisher, MixCategoryCreated, MixCategoryDeleted, MixCategoryUpdated};
use crate::repositories::MixCategoryRepository;

pub struct MixCategoryService {
    document_repo: Arc<dyn MixCategoryRepository>,
    publisher: EventPublisher,
}

impl MixCategoryService {
    pub fn new(document_repo: Arc<dyn MixCategoryRepository>, publisher: EventPublisher) -> Self {
        Self {
            document_repo,
            publisher,
        }
    }

    pub fn get_by_document_id(&self, document_id: &DocumentId) -> AppResult<Option<MixCategory>> {
        self.document_repo.find_by_document_id(document_id)
    }

    pub fn get_by_entity_id(&self, entity_id: i64) -> AppResult<Option<MixCategory>> {
        self.document_repo.find_by_entity_id(entity_id)
    }

    pub fn insert(&self, document: MixCategory) -> AppResult<MixCategory> {
        validate_document(&document)?;

        if self
            .document_repo
            .find_by_entity_id(document.entity_id)?
            .is_some()
        {
            return Err(AppError::invalid_input(format!(
                "A document for category {} already exists",
                document.entity_id
            )));
        }

        let stored = self.document_repo.insert(&document)?;
        log::info!(
            "Inserted document for category {} ('{}')",
            stored.entity_id,
            stored.name
        );

        self.publisher
            .publish(&MixCategoryCreated::new(stored.clone()))?;
        Ok(stored)
    }

    /// Replace a stored document. Unchanged content is neither written nor
    /// published; the stored copy is returned as is.
    pub fn update(&self, document: MixCategory) -> AppResult<MixCategory> {
        validate_document(&document)?;
        let document_id = require_document_id(&document)?;

        let current = self
            .document_repo
            .find_by_document_id(document_id)?
            .ok_or(AppError::NotFound)?;

        if current.same_content(&document) {
            log::debug!(
                "Document for category {} unchanged, skipping write",
                document.entity_id
            );
            return Ok(current);
        }

        let stored = self.document_repo.replace(&document)?;
        log::debug!(
            "Replaced document for category {} (version {})",
            stored.entity_id,
            stored.version
        );

        self.publisher
            .publish(&MixCategoryUpdated::new(stored.clone()))?;
        Ok(stored)
    }

    /// Remove a document. Returns false (and publishes nothing) when it was
    /// already gone.
    pub fn delete(&self, document: &MixCategory) -> AppResult<bool> {
        let document_id = require_document_id(document)?;

        if !self.document_repo.delete(document_id)? {
            log::debug!("Document {} already absent", document_id);
            return Ok(false);
        }
        log::info!("Deleted document for category {}", document.entity_id);

        self.publisher
            .publish(&MixCategoryDeleted::new(document.clone()))?;
        Ok(true)
    }
}

fn validate_document(document: &MixCategory) -> AppResult<()> {
    if document.entity_id <= 0 {
        return Err(AppError::invalid_input(format!(
            "Document entity id {} is not a stored category",
            document.entity_id
        )));
    }
    if document.name.trim().is_empty() {
        return Err(AppError::invalid_input("Document name cannot be empty"));
    }
    Ok(())
}

fn require_document_id(document: &MixCategory) -> AppResult<&DocumentId> {
    document.document_id.as_ref().ok_or_else(|| {
        AppError::invalid_input(format!(
            "Document for category {} has no document id",
            document.entity_id
        ))
    })
}
