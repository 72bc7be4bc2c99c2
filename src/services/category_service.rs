// src/services/category_service.rs
//
// Write-model commands and queries for categories.
// Every successful mutation is persisted first, then published.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{validate_category, Category, ROOT_PARENT_ID};
use crate::error::{AppError, AppResult};
use crate::events::{CategoryCreated, CategoryDeleted, CategoryUpdated, EventPublisher};
use crate::repositories::CategoryRepository;
use crate::settings::BreadcrumbConfig;

pub const BREADCRUMB_SEPARATOR: &str = " >> ";

#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub parent_id: i64,
    pub display_order: i32,
    pub description: String,
    pub published: bool,
}

impl CreateCategoryRequest {
    /// A published root category with default ordering
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: ROOT_PARENT_ID,
            display_order: 0,
            description: String::new(),
            published: true,
        }
    }

    /// A published category under `parent_id`
    pub fn child_of(parent_id: i64, name: impl Into<String>) -> Self {
        Self {
            parent_id,
            ..Self::root(name)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryRequest {
    pub category_id: i64,
    pub name: Option<String>,
    pub parent_id: Option<i64>,
    pub display_order: Option<i32>,
    pub description: Option<String>,
    pub published: Option<bool>,
}

/// Where a breadcrumb string starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreadcrumbTarget {
    UseSelf,
    UseParent,
}

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    publisher: EventPublisher,
    breadcrumb: BreadcrumbConfig,
}

impl CategoryService {
    pub fn new(
        category_repo: Arc<dyn CategoryRepository>,
        publisher: EventPublisher,
        breadcrumb: BreadcrumbConfig,
    ) -> Self {
        Self {
            category_repo,
            publisher,
            breadcrumb,
        }
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    pub fn create_category(&self, request: CreateCategoryRequest) -> AppResult<Category> {
        let mut category = Category::new(request.name);
        category.parent_id = request.parent_id;
        category.display_order = request.display_order;
        category.description = request.description;
        category.published = request.published;

        validate_category(&category)?;
        self.ensure_parent_exists(category.parent_id)?;

        category.id = self.category_repo.insert(&category)?;
        log::info!("Created category {} '{}'", category.id, category.name);

        self.publisher
            .publish(&CategoryCreated::new(category.clone()))?;
        Ok(category)
    }

    pub fn update_category(&self, request: UpdateCategoryRequest) -> AppResult<Category> {
        let mut category = self
            .category_repo
            .get_by_id(request.category_id)?
            .ok_or(AppError::NotFound)?;

        if let Some(name) = request.name {
            category.name = name;
        }
        if let Some(display_order) = request.display_order {
            category.display_order = display_order;
        }
        if let Some(description) = request.description {
            category.description = description;
        }
        if let Some(published) = request.published {
            category.published = published;
        }
        let previous_parent_id = category.parent_id;
        let reparented = request
            .parent_id
            .filter(|parent_id| *parent_id != category.parent_id);
        if let Some(parent_id) = reparented {
            category.parent_id = parent_id;
        }

        validate_category(&category)?;
        if reparented.is_some() {
            self.ensure_parent_exists(category.parent_id)?;
            self.ensure_not_descendant(category.id, category.parent_id)?;
        }

        self.category_repo.save(&category)?;
        log::info!("Updated category {} '{}'", category.id, category.name);

        self.publisher
            .publish(&CategoryUpdated::moved(category.clone(), previous_parent_id))?;
        Ok(category)
    }

    /// Soft-delete a category. Deleting twice is a no-op.
    pub fn delete_category(&self, category_id: i64) -> AppResult<()> {
        let mut category = self
            .category_repo
            .get_by_id(category_id)?
            .ok_or(AppError::NotFound)?;

        if category.is_deleted() {
            log::debug!("Category {} is already deleted", category_id);
            return Ok(());
        }

        category.mark_deleted();
        self.category_repo.save(&category)?;
        log::info!("Deleted category {} '{}'", category.id, category.name);

        self.publisher.publish(&CategoryDeleted::new(category))
    }

    fn ensure_parent_exists(&self, parent_id: i64) -> AppResult<()> {
        if parent_id == ROOT_PARENT_ID {
            return Ok(());
        }
        if self.category_repo.get_by_id(parent_id)?.is_none() {
            return Err(AppError::invalid_input(format!(
                "Parent category {} does not exist",
                parent_id
            )));
        }
        Ok(())
    }

    /// Reject moving a category under one of its own descendants
    fn ensure_not_descendant(&self, category_id: i64, new_parent_id: i64) -> AppResult<()> {
        let Some(parent) = self.category_repo.get_by_id(new_parent_id)? else {
            return Ok(());
        };
        let mut chain = self.ancestors(&parent)?;
        chain.push(parent);
        if chain.iter().any(|ancestor| ancestor.id == category_id) {
            return Err(AppError::invalid_input(format!(
                "Moving category {} under {} would create a cycle",
                category_id, new_parent_id
            )));
        }
        Ok(())
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn get_by_id(&self, category_id: i64) -> AppResult<Option<Category>> {
        self.category_repo.get_by_id(category_id)
    }

    pub fn get_children(&self, category: &Category, include_hidden: bool) -> AppResult<Vec<Category>> {
        self.category_repo.list_children(category.id, include_hidden)
    }

    /// Every ancestor of `category`, nearest first, without depth bound.
    /// Stops at a root or a missing parent; fails if the chain loops.
    pub fn ancestors(&self, category: &Category) -> AppResult<Vec<Category>> {
        let mut visited = HashSet::from([category.id]);
        let mut chain = Vec::new();
        let mut parent_id = category.parent_id;

        while parent_id != ROOT_PARENT_ID {
            let Some(parent) = self.category_repo.get_by_id(parent_id)? else {
                break;
            };
            if !visited.insert(parent.id) {
                return Err(AppError::CyclicHierarchy {
                    category_id: parent.id,
                });
            }
            parent_id = parent.parent_id;
            chain.push(parent);
        }

        Ok(chain)
    }

    /// Root-first chain ending with `category`, walking at most `max_depth`
    /// ancestors. Without `show_hidden`, a chain containing any hidden
    /// category is returned empty rather than partial.
    pub fn get_breadcrumb(
        &self,
        category: &Category,
        max_depth: usize,
        show_hidden: bool,
    ) -> AppResult<Vec<Category>> {
        let mut chain = vec![category.clone()];
        let mut visited = HashSet::from([category.id]);
        let mut parent_id = category.parent_id;
        let mut level = 0;

        while level < max_depth && parent_id != ROOT_PARENT_ID {
            let Some(parent) = self.category_repo.get_by_id(parent_id)? else {
                break;
            };
            if !visited.insert(parent.id) {
                return Err(AppError::CyclicHierarchy {
                    category_id: parent.id,
                });
            }
            parent_id = parent.parent_id;
            chain.push(parent);
            level += 1;
        }

        chain.reverse();

        if !show_hidden && chain.iter().any(|node| !node.is_visible()) {
            return Ok(Vec::new());
        }
        Ok(chain)
    }

    /// Breadcrumb rendered as text, e.g. "Home >> Garden >> Tools"
    pub fn breadcrumb_text(
        &self,
        category_id: i64,
        target: BreadcrumbTarget,
        show_hidden: bool,
    ) -> AppResult<String> {
        let category = self
            .category_repo
            .get_by_id(category_id)?
            .ok_or(AppError::NotFound)?;

        let start = match target {
            BreadcrumbTarget::UseSelf => category,
            BreadcrumbTarget::UseParent => {
                if category.is_root() {
                    return Ok(String::new());
                }
                match self.category_repo.get_by_id(category.parent_id)? {
                    Some(parent) => parent,
                    None => return Ok(String::new()),
                }
            }
        };

        if start.is_deleted() || (!show_hidden && !start.published) {
            return Ok(String::new());
        }

        let chain = self.get_breadcrumb(&start, self.breadcrumb.max_depth, show_hidden)?;
        Ok(chain
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(BREADCRUMB_SEPARATOR))
    }
}
