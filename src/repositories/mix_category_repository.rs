// src/repositories/mix_category_repository.rs
//
// Document store for the denormalized read model.
//
// Documents are stored whole as JSON, one row per document, in a collection
// table whose name comes from configuration. Every update is a full replace
// guarded by the document's version token.

use std::sync::Arc;

use regex::Regex;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::ConnectionPool;
use crate::domain::{DocumentId, MixCategory};
use crate::error::{AppError, AppResult};
use crate::settings::CollectionConfig;

#[cfg_attr(test, mockall::automock)]
pub trait MixCategoryRepository: Send + Sync {
    fn find_by_document_id(&self, document_id: &DocumentId) -> AppResult<Option<MixCategory>>;
    fn find_by_entity_id(&self, entity_id: i64) -> AppResult<Option<MixCategory>>;
    /// Store a new document; the returned copy carries its id and version
    fn insert(&self, document: &MixCategory) -> AppResult<MixCategory>;
    /// Replace the whole document if its stored version still matches
    fn replace(&self, document: &MixCategory) -> AppResult<MixCategory>;
    /// Returns false when no such document existed
    fn delete(&self, document_id: &DocumentId) -> AppResult<bool>;
}

pub struct SqliteMixCategoryRepository {
    pool: Arc<ConnectionPool>,
    collection: String,
}

impl SqliteMixCategoryRepository {
    /// Bind the repository to its collection, creating the table if needed
    pub fn new(pool: Arc<ConnectionPool>, config: &CollectionConfig) -> AppResult<Self> {
        let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .map_err(|e| AppError::Other(format!("Invalid identifier pattern: {}", e)))?;
        if !identifier.is_match(&config.collection) {
            return Err(AppError::invalid_input(format!(
                "Collection name '{}' is not a valid identifier",
                config.collection
            )));
        }

        let repo = Self {
            pool,
            collection: config.collection.clone(),
        };
        repo.ensure_collection()?;
        Ok(repo)
    }

    fn ensure_collection(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {c} (
                 document_id  TEXT PRIMARY KEY,
                 entity_id    INTEGER NOT NULL UNIQUE,
                 version      INTEGER NOT NULL,
                 body         TEXT NOT NULL
             );",
            c = self.collection
        ))?;
        Ok(())
    }

    fn encode_body(document: &MixCategory) -> AppResult<String> {
        let mut body = document.clone();
        body.document_id = None;
        body.version = 0;
        Ok(serde_json::to_string(&body)?)
    }

    fn row_to_document(row: &Row) -> Result<MixCategory, rusqlite::Error> {
        let document_id: String = row.get("document_id")?;
        let version: i64 = row.get("version")?;
        let body: String = row.get("body")?;

        let mut document: MixCategory = serde_json::from_str(&body).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;
        document.document_id = Some(DocumentId::from(document_id));
        document.version = version as u64;
        Ok(document)
    }

    fn find_one(&self, column: &str, value: &dyn rusqlite::ToSql) -> AppResult<Option<MixCategory>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT document_id, version, body FROM {} WHERE {} = ?1",
            self.collection, column
        ))?;

        let document = stmt
            .query_row([value], Self::row_to_document)
            .optional()?;
        Ok(document)
    }
}

impl MixCategoryRepository for SqliteMixCategoryRepository {
    fn find_by_document_id(&self, document_id: &DocumentId) -> AppResult<Option<MixCategory>> {
        self.find_one("document_id", &document_id.as_str())
    }

    fn find_by_entity_id(&self, entity_id: i64) -> AppResult<Option<MixCategory>> {
        self.find_one("entity_id", &entity_id)
    }

    fn insert(&self, document: &MixCategory) -> AppResult<MixCategory> {
        let document_id = document
            .document_id
            .clone()
            .unwrap_or_else(DocumentId::generate);
        let body = Self::encode_body(document)?;

        let conn = self.pool.get()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (document_id, entity_id, version, body) VALUES (?1, ?2, 1, ?3)",
                self.collection
            ),
            params![document_id.as_str(), document.entity_id, body],
        )?;

        let mut stored = document.clone();
        stored.document_id = Some(document_id);
        stored.version = 1;
        Ok(stored)
    }

    fn replace(&self, document: &MixCategory) -> AppResult<MixCategory> {
        let document_id = document
            .document_id
            .clone()
            .ok_or_else(|| AppError::invalid_input("Cannot replace a document without an id"))?;
        let body = Self::encode_body(document)?;
        let expected_version = document.version as i64;

        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            &format!(
                "UPDATE {} SET entity_id = ?2, body = ?3, version = version + 1
                 WHERE document_id = ?1 AND version = ?4",
                self.collection
            ),
            params![
                document_id.as_str(),
                document.entity_id,
                body,
                expected_version
            ],
        )?;

        if rows_affected == 0 {
            let exists: bool = conn.query_row(
                &format!(
                    "SELECT EXISTS(SELECT 1 FROM {} WHERE document_id = ?1)",
                    self.collection
                ),
                params![document_id.as_str()],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(AppError::NotFound);
            }
            return Err(AppError::ConcurrencyConflict {
                document_id: document_id.to_string(),
                expected: document.version,
            });
        }

        let mut stored = document.clone();
        stored.version = document.version + 1;
        Ok(stored)
    }

    fn delete(&self, document_id: &DocumentId) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            &format!("DELETE FROM {} WHERE document_id = ?1", self.collection),
            params![document_id.as_str()],
        )?;
        Ok(rows_affected > 0)
    }
}
