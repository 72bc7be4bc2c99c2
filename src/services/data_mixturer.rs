// src/services/data_mixturer.rs
//
// Visibility state machine between categories and their documents.
//
// A category has a document iff it is published and not deleted:
//
// | Event   | visible                              | hidden                  |
// |---------|--------------------------------------|-------------------------|
// | Created | create document, seed its children   | nothing                 |
// | Updated | create (and seed) or update in place | delete document if any  |
// | Deleted | delete document if any               | delete document if any  |
//
// Every category event then refreshes breadcrumbs, whatever the outcome.
// Document events only refresh the parent's children list; visibility was
// already decided on the category side.

use std::sync::Arc;

use crate::domain::{Category, MixCategory};
use crate::error::AppResult;
use crate::services::dependency_resolver::DependencyResolver;

pub struct DataMixturer {
    resolver: Arc<dyn DependencyResolver>,
}

impl DataMixturer {
    pub fn new(resolver: Arc<dyn DependencyResolver>) -> Self {
        Self { resolver }
    }

    pub fn on_category_created(&self, category: &Category) -> AppResult<()> {
        if category.is_visible() {
            self.create_with_children(category)?;
        } else {
            log::debug!("Category {} created hidden, no document", category.id);
        }
        self.resolver.refresh_breadcrumbs_for_category(category)
    }

    /// `moved_from` is the previous parent when the category was moved. Both
    /// parents are refreshed then, since the category's own document may come
    /// out unchanged and start no cascade of its own.
    pub fn on_category_updated(
        &self,
        category: &Category,
        moved_from: Option<i64>,
    ) -> AppResult<()> {
        if category.is_visible() {
            if self.resolver.has_document(category)? {
                self.resolver.update_document_for_category(category)?;
            } else {
                self.create_with_children(category)?;
            }
        } else {
            self.resolver.delete_document_for_category(category)?;
        }
        if let Some(previous_parent_id) = moved_from {
            self.resolver
                .refresh_children_of_parent_id(previous_parent_id)?;
            if category.is_visible() {
                self.resolver.refresh_children_of_parent(category)?;
            }
        }
        self.resolver.refresh_breadcrumbs_for_category(category)
    }

    pub fn on_category_deleted(&self, category: &Category) -> AppResult<()> {
        self.resolver.delete_document_for_category(category)?;
        self.resolver.refresh_breadcrumbs_for_category(category)
    }

    /// Shared by the created, updated and deleted document events: any of
    /// them can change what the parent lists.
    pub fn on_document_changed(&self, document: &MixCategory) -> AppResult<()> {
        self.resolver.refresh_children_of_parent_for_document(document)
    }

    /// A category becoming visible again may already have visible children
    fn create_with_children(&self, category: &Category) -> AppResult<()> {
        self.resolver.create_document_for_category(category)?;
        self.resolver.refresh_children(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapping::to_document;
    use crate::error::AppError;
    use crate::services::dependency_resolver::MockDependencyResolver;
    use mockall::predicate::eq;

    fn category(published: bool) -> Category {
        let mut category = Category::new("Books");
        category.id = 3;
        category.parent_id = 1;
        category.published = published;
        category
    }

    fn deleted() -> Category {
        let mut category = category(true);
        category.mark_deleted();
        category
    }

    #[test]
    fn test_created_visible_creates_and_refreshes() {
        let cat = category(true);
        let mut resolver = MockDependencyResolver::new();
        resolver
            .expect_create_document_for_category()
            .with(eq(cat.clone()))
            .times(1)
            .returning(|_| Ok(()));
        resolver.expect_refresh_children().times(1).returning(|_| Ok(()));
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_created(&cat)
            .unwrap();
    }

    #[test]
    fn test_created_hidden_touches_no_document() {
        let mut resolver = MockDependencyResolver::new();
        resolver.expect_create_document_for_category().never();
        resolver.expect_refresh_children().never();
        resolver.expect_refresh_children_of_parent().never();
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_created(&category(false))
            .unwrap();
    }

    #[test]
    fn test_updated_visible_with_document_updates_in_place() {
        let mut resolver = MockDependencyResolver::new();
        resolver.expect_has_document().returning(|_| Ok(true));
        resolver
            .expect_update_document_for_category()
            .times(1)
            .returning(|_| Ok(()));
        resolver.expect_create_document_for_category().never();
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_updated(&category(true), None)
            .unwrap();
    }

    #[test]
    fn test_updated_visible_without_document_creates() {
        let mut resolver = MockDependencyResolver::new();
        resolver.expect_has_document().returning(|_| Ok(false));
        resolver
            .expect_create_document_for_category()
            .times(1)
            .returning(|_| Ok(()));
        resolver.expect_refresh_children().times(1).returning(|_| Ok(()));
        resolver.expect_update_document_for_category().never();
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_updated(&category(true), None)
            .unwrap();
    }

    #[test]
    fn test_updated_hidden_deletes() {
        for hidden in [category(false), deleted()] {
            let mut resolver = MockDependencyResolver::new();
            resolver
                .expect_delete_document_for_category()
                .times(1)
                .returning(|_| Ok(()));
            resolver.expect_update_document_for_category().never();
            resolver
                .expect_refresh_breadcrumbs_for_category()
                .times(1)
                .returning(|_| Ok(()));

            DataMixturer::new(Arc::new(resolver))
                .on_category_updated(&hidden, None)
                .unwrap();
        }
    }

    #[test]
    fn test_move_refreshes_both_parents() {
        let mut resolver = MockDependencyResolver::new();
        resolver.expect_has_document().returning(|_| Ok(true));
        resolver
            .expect_update_document_for_category()
            .returning(|_| Ok(()));
        resolver
            .expect_refresh_children_of_parent_id()
            .with(eq(9))
            .times(1)
            .returning(|_| Ok(()));
        resolver
            .expect_refresh_children_of_parent()
            .with(eq(category(true)))
            .times(1)
            .returning(|_| Ok(()));
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_updated(&category(true), Some(9))
            .unwrap();
    }

    #[test]
    fn test_hidden_move_refreshes_previous_parent_only() {
        let mut resolver = MockDependencyResolver::new();
        resolver
            .expect_delete_document_for_category()
            .returning(|_| Ok(()));
        resolver
            .expect_refresh_children_of_parent_id()
            .with(eq(9))
            .times(1)
            .returning(|_| Ok(()));
        resolver.expect_refresh_children_of_parent().never();
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_updated(&category(false), Some(9))
            .unwrap();
    }

    #[test]
    fn test_deleted_deletes_and_still_refreshes_breadcrumbs() {
        let mut resolver = MockDependencyResolver::new();
        resolver
            .expect_delete_document_for_category()
            .times(1)
            .returning(|_| Ok(()));
        resolver
            .expect_refresh_breadcrumbs_for_category()
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_category_deleted(&deleted())
            .unwrap();
    }

    #[test]
    fn test_document_change_refreshes_parent_only() {
        let doc = to_document(&category(true));
        let mut resolver = MockDependencyResolver::new();
        resolver
            .expect_refresh_children_of_parent_for_document()
            .with(eq(doc.clone()))
            .times(1)
            .returning(|_| Ok(()));

        DataMixturer::new(Arc::new(resolver))
            .on_document_changed(&doc)
            .unwrap();
    }

    #[test]
    fn test_resolver_failure_skips_breadcrumb_refresh() {
        let mut resolver = MockDependencyResolver::new();
        resolver
            .expect_create_document_for_category()
            .returning(|_| Err(AppError::Pool("store unreachable".to_string())));
        resolver.expect_refresh_breadcrumbs_for_category().never();

        let result = DataMixturer::new(Arc::new(resolver)).on_category_created(&category(true));
        assert!(matches!(result, Err(AppError::Pool(_))));
    }
}
