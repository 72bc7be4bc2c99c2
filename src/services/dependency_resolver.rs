// src/services/dependency_resolver.rs
//
// Keeps documents in step with the category tree: one document per visible
// category, each parent's children list, and every breadcrumb.
//
// Lookup misses are not errors here. A missing parent, category or document
// simply ends that branch of the cascade.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::mapping::{apply_category, to_document, to_summary};
use crate::domain::{Category, MixCategory, ROOT_PARENT_ID};
use crate::error::{AppError, AppResult};
use crate::services::category_service::CategoryService;
use crate::services::mix_category_service::MixCategoryService;
use crate::settings::BreadcrumbConfig;

/// Document-level operations the data mixturer orchestrates
#[cfg_attr(test, mockall::automock)]
pub trait DependencyResolver: Send + Sync {
    fn has_document(&self, category: &Category) -> AppResult<bool>;
    fn create_document_for_category(&self, category: &Category) -> AppResult<()>;
    /// Falls back to creating the document when none exists
    fn update_document_for_category(&self, category: &Category) -> AppResult<()>;
    fn delete_document_for_category(&self, category: &Category) -> AppResult<()>;
    /// Recompute the children list of the category's own document
    fn refresh_children(&self, category: &Category) -> AppResult<()>;
    fn refresh_children_of_parent(&self, category: &Category) -> AppResult<()>;
    /// Same as `refresh_children_of_parent`, addressed by the parent's id
    fn refresh_children_of_parent_id(&self, parent_id: i64) -> AppResult<()>;
    fn refresh_children_of_parent_for_document(&self, document: &MixCategory) -> AppResult<()>;
    /// Recompute the breadcrumb of the category's document and of every
    /// descendant document within the breadcrumb depth
    fn refresh_breadcrumbs_for_category(&self, category: &Category) -> AppResult<()>;
}

pub struct CategoryDependencyResolver {
    categories: Arc<CategoryService>,
    documents: Arc<MixCategoryService>,
    breadcrumb: BreadcrumbConfig,
}

impl CategoryDependencyResolver {
    pub fn new(
        categories: Arc<CategoryService>,
        documents: Arc<MixCategoryService>,
        breadcrumb: BreadcrumbConfig,
    ) -> Self {
        Self {
            categories,
            documents,
            breadcrumb,
        }
    }

    fn refresh_breadcrumb(&self, category: &Category) -> AppResult<()> {
        let Some(mut document) = self.documents.get_by_entity_id(category.id)? else {
            return Ok(());
        };

        let chain = self
            .categories
            .get_breadcrumb(category, self.breadcrumb.max_depth, false)?;
        document.breadcrumb = chain.iter().map(to_summary).collect();

        self.documents.update(document)?;
        Ok(())
    }
}

fn ensure_persisted(category: &Category) -> AppResult<()> {
    if category.id <= 0 {
        return Err(AppError::invalid_input(format!(
            "Category '{}' has not been stored yet",
            category.name
        )));
    }
    Ok(())
}

impl DependencyResolver for CategoryDependencyResolver {
    fn has_document(&self, category: &Category) -> AppResult<bool> {
        ensure_persisted(category)?;
        Ok(self.documents.get_by_entity_id(category.id)?.is_some())
    }

    fn create_document_for_category(&self, category: &Category) -> AppResult<()> {
        ensure_persisted(category)?;
        self.documents.insert(to_document(category))?;
        Ok(())
    }

    fn update_document_for_category(&self, category: &Category) -> AppResult<()> {
        ensure_persisted(category)?;
        match self.documents.get_by_entity_id(category.id)? {
            None => self.create_document_for_category(category),
            Some(mut document) => {
                apply_category(&mut document, category);
                self.documents.update(document)?;
                Ok(())
            }
        }
    }

    fn delete_document_for_category(&self, category: &Category) -> AppResult<()> {
        ensure_persisted(category)?;
        if let Some(document) = self.documents.get_by_entity_id(category.id)? {
            self.documents.delete(&document)?;
        }
        Ok(())
    }

    fn refresh_children(&self, category: &Category) -> AppResult<()> {
        ensure_persisted(category)?;
        if self.documents.get_by_entity_id(category.id)?.is_none() {
            self.create_document_for_category(category)?;
        }
        // Re-read: creating the document may have cascaded into further writes
        let Some(mut document) = self.documents.get_by_entity_id(category.id)? else {
            return Ok(());
        };

        let children = self.categories.get_children(category, false)?;
        document.children = children.iter().map(to_summary).collect();

        self.documents.update(document)?;
        Ok(())
    }

    fn refresh_children_of_parent(&self, category: &Category) -> AppResult<()> {
        if category.is_root() {
            return Ok(());
        }
        self.refresh_children_of_parent_id(category.parent_id)
    }

    fn refresh_children_of_parent_id(&self, parent_id: i64) -> AppResult<()> {
        if parent_id == ROOT_PARENT_ID {
            return Ok(());
        }
        let Some(parent) = self.categories.get_by_id(parent_id)? else {
            log::debug!("Parent {} not found", parent_id);
            return Ok(());
        };
        if !parent.is_visible() {
            log::debug!("Parent {} is hidden, no document to refresh", parent.id);
            return Ok(());
        }

        // The cascade climbs this chain one event at a time; refuse to start
        // on a looping chain.
        self.categories.ancestors(&parent)?;

        self.refresh_children(&parent)
    }

    fn refresh_children_of_parent_for_document(&self, document: &MixCategory) -> AppResult<()> {
        match self.categories.get_by_id(document.entity_id)? {
            Some(category) => self.refresh_children_of_parent(&category),
            None => Ok(()),
        }
    }

    fn refresh_breadcrumbs_for_category(&self, category: &Category) -> AppResult<()> {
        ensure_persisted(category)?;
        self.refresh_breadcrumb(category)?;

        let mut visited = HashSet::from([category.id]);
        let mut frontier = vec![category.clone()];

        for _ in 0..self.breadcrumb.max_depth {
            let mut next = Vec::new();
            for node in &frontier {
                for child in self.categories.get_children(node, true)? {
                    if !visited.insert(child.id) {
                        return Err(AppError::CyclicHierarchy {
                            category_id: child.id,
                        });
                    }
                    self.refresh_breadcrumb(&child)?;
                    next.push(child);
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, get_connection, initialize_database};
    use crate::events::EventPublisher;
    use crate::repositories::{
        MockCategoryRepository, SqliteCategoryRepository, SqliteMixCategoryRepository,
    };
    use crate::services::category_service::CreateCategoryRequest;
    use crate::settings::CollectionConfig;

    // The resolver alone, with no handlers wired: no cascade runs, so each
    // test observes exactly one resolver step.
    struct Fixture {
        categories: Arc<CategoryService>,
        documents: Arc<MixCategoryService>,
        resolver: CategoryDependencyResolver,
    }

    fn fixture() -> Fixture {
        let pool = Arc::new(create_memory_pool().unwrap());
        initialize_database(&get_connection(&pool).unwrap()).unwrap();

        let categories = Arc::new(CategoryService::new(
            Arc::new(SqliteCategoryRepository::new(Arc::clone(&pool))),
            EventPublisher::detached(),
            BreadcrumbConfig::default(),
        ));
        let documents = Arc::new(MixCategoryService::new(
            Arc::new(
                SqliteMixCategoryRepository::new(pool, &CollectionConfig::default()).unwrap(),
            ),
            EventPublisher::detached(),
        ));
        let resolver = CategoryDependencyResolver::new(
            Arc::clone(&categories),
            Arc::clone(&documents),
            BreadcrumbConfig::default(),
        );
        Fixture {
            categories,
            documents,
            resolver,
        }
    }

    impl Fixture {
        fn create(&self, request: CreateCategoryRequest) -> Category {
            self.categories.create_category(request).unwrap()
        }

        fn document(&self, category: &Category) -> Option<MixCategory> {
            self.documents.get_by_entity_id(category.id).unwrap()
        }
    }

    #[test]
    fn test_create_starts_with_empty_computed_fields() {
        let f = fixture();
        let a = f.create(CreateCategoryRequest::root("A"));
        f.resolver.create_document_for_category(&a).unwrap();

        let doc = f.document(&a).unwrap();
        assert_eq!(doc.name, "A");
        assert!(doc.children.is_empty());
        assert!(doc.breadcrumb.is_empty());
    }

    #[test]
    fn test_update_creates_when_absent_and_preserves_computed_fields() {
        let f = fixture();
        let mut a = f.create(CreateCategoryRequest::root("A"));
        let b = f.create(CreateCategoryRequest::child_of(a.id, "B"));

        f.resolver.update_document_for_category(&a).unwrap();
        f.resolver.refresh_children(&a).unwrap();
        assert_eq!(f.document(&a).unwrap().children.len(), 1);

        a.name = "A renamed".to_string();
        f.resolver.update_document_for_category(&a).unwrap();

        let doc = f.document(&a).unwrap();
        assert_eq!(doc.name, "A renamed");
        assert_eq!(doc.children[0].entity_id, b.id);
    }

    #[test]
    fn test_delete_is_noop_when_absent() {
        let f = fixture();
        let a = f.create(CreateCategoryRequest::root("A"));
        f.resolver.delete_document_for_category(&a).unwrap();

        f.resolver.create_document_for_category(&a).unwrap();
        f.resolver.delete_document_for_category(&a).unwrap();
        assert!(f.document(&a).is_none());
    }

    #[test]
    fn test_refresh_children_of_parent_lists_visible_children_in_order() {
        let f = fixture();
        let a = f.create(CreateCategoryRequest::root("A"));
        let mut late = CreateCategoryRequest::child_of(a.id, "Late");
        late.display_order = 5;
        let late = f.create(late);
        let early = f.create(CreateCategoryRequest::child_of(a.id, "Early"));
        let mut hidden = CreateCategoryRequest::child_of(a.id, "Hidden");
        hidden.published = false;
        f.create(hidden);

        // Parent document is created on demand
        f.resolver.refresh_children_of_parent(&early).unwrap();

        let children: Vec<i64> = f
            .document(&a)
            .unwrap()
            .children
            .iter()
            .map(|c| c.entity_id)
            .collect();
        assert_eq!(children, vec![early.id, late.id]);
    }

    #[test]
    fn test_refresh_children_of_parent_skips_roots_and_hidden_parents() {
        let f = fixture();
        let mut hidden = CreateCategoryRequest::root("Hidden");
        hidden.published = false;
        let hidden = f.create(hidden);
        let child = f.create(CreateCategoryRequest::child_of(hidden.id, "Child"));

        f.resolver.refresh_children_of_parent(&hidden).unwrap();
        f.resolver.refresh_children_of_parent(&child).unwrap();
        assert!(f.document(&hidden).is_none());
    }

    #[test]
    fn test_refresh_for_document_of_unknown_category_is_noop() {
        let f = fixture();
        let mut ghost = Category::new("Ghost");
        ghost.id = 404;
        f.resolver
            .refresh_children_of_parent_for_document(&to_document(&ghost))
            .unwrap();
    }

    #[test]
    fn test_breadcrumbs_refresh_fans_out_to_descendants() {
        let f = fixture();
        let a = f.create(CreateCategoryRequest::root("A"));
        let b = f.create(CreateCategoryRequest::child_of(a.id, "B"));
        let c = f.create(CreateCategoryRequest::child_of(b.id, "C"));
        for category in [&a, &b, &c] {
            f.resolver.create_document_for_category(category).unwrap();
        }

        f.resolver.refresh_breadcrumbs_for_category(&a).unwrap();

        let trail: Vec<String> = f
            .document(&c)
            .unwrap()
            .breadcrumb
            .iter()
            .map(|node| node.name.clone())
            .collect();
        assert_eq!(trail, vec!["A", "B", "C"]);
        assert_eq!(f.document(&a).unwrap().breadcrumb.len(), 1);
    }

    #[test]
    fn test_breadcrumbs_blank_under_hidden_ancestor() {
        let f = fixture();
        let a = f.create(CreateCategoryRequest::root("A"));
        let b = f.create(CreateCategoryRequest::child_of(a.id, "B"));
        f.resolver.create_document_for_category(&b).unwrap();
        f.resolver.refresh_breadcrumbs_for_category(&a).unwrap();
        assert_eq!(f.document(&b).unwrap().breadcrumb.len(), 2);

        f.categories.delete_category(a.id).unwrap();
        let deleted_a = f.categories.get_by_id(a.id).unwrap().unwrap();
        f.resolver.refresh_breadcrumbs_for_category(&deleted_a).unwrap();

        assert!(f.document(&b).unwrap().breadcrumb.is_empty());
    }

    #[test]
    fn test_unsaved_category_is_rejected() {
        let f = fixture();
        let result = f
            .resolver
            .create_document_for_category(&Category::new("Unsaved"));
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_cyclic_parent_chain_is_refused() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_get_by_id().returning(|id| {
            let mut category = Category::new(format!("node-{}", id));
            category.id = id;
            category.parent_id = if id == 1 { 2 } else { 1 };
            Ok(Some(category))
        });
        let pool = Arc::new(create_memory_pool().unwrap());
        let resolver = CategoryDependencyResolver::new(
            Arc::new(CategoryService::new(
                Arc::new(repo),
                EventPublisher::detached(),
                BreadcrumbConfig::default(),
            )),
            Arc::new(MixCategoryService::new(
                Arc::new(
                    SqliteMixCategoryRepository::new(pool, &CollectionConfig::default())
                        .unwrap(),
                ),
                EventPublisher::detached(),
            )),
            BreadcrumbConfig::default(),
        );

        let mut node = Category::new("node-1");
        node.id = 1;
        node.parent_id = 2;
        assert!(matches!(
            resolver.refresh_children_of_parent(&node),
            Err(AppError::CyclicHierarchy { .. })
        ));
    }
}
