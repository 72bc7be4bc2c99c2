// src/repositories/category_repository.rs
//
// Category persistence (relational write model)

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::Category;
use crate::error::{AppError, AppResult};

#[cfg_attr(test, mockall::automock)]
pub trait CategoryRepository: Send + Sync {
    /// Insert a new row and return the store-assigned id
    fn insert(&self, category: &Category) -> AppResult<i64>;
    /// Overwrite an existing row
    fn save(&self, category: &Category) -> AppResult<()>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Category>>;
    /// Direct children ordered by display order, then id.
    /// Hidden (unpublished or deleted) children are skipped unless requested.
    fn list_children(&self, parent_id: i64, include_hidden: bool) -> AppResult<Vec<Category>>;
}

pub struct SqliteCategoryRepository {
    pool: Arc<ConnectionPool>,
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, parent_id, display_order, description, published, deleted FROM categories";

impl SqliteCategoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
        Ok(Category::restore(
            row.get("id")?,
            row.get("name")?,
            row.get("parent_id")?,
            row.get("display_order")?,
            row.get("description")?,
            row.get("published")?,
            row.get("deleted")?,
        ))
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn insert(&self, category: &Category) -> AppResult<i64> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO categories (name, parent_id, display_order, description, published, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.name,
                category.parent_id,
                category.display_order,
                category.description,
                category.published,
                category.is_deleted(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn save(&self, category: &Category) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE categories
             SET name = ?2, parent_id = ?3, display_order = ?4, description = ?5,
                 published = ?6, deleted = ?7
             WHERE id = ?1",
            params![
                category.id,
                category.name,
                category.parent_id,
                category.display_order,
                category.description,
                category.published,
                category.is_deleted(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_category) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_children(&self, parent_id: i64, include_hidden: bool) -> AppResult<Vec<Category>> {
        let conn = self.pool.get()?;

        let filter = if include_hidden {
            ""
        } else {
            " AND published = 1 AND deleted = 0"
        };
        let mut stmt = conn.prepare(&format!(
            "{} WHERE parent_id = ?1{} ORDER BY display_order, id",
            SELECT_COLUMNS, filter
        ))?;

        let children = stmt
            .query_map(params![parent_id], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(children)
    }
}
