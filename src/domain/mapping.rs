// src/domain/mapping.rs
//
// Category <-> MixCategory field mapping.
// Computed fields (children, breadcrumb) are never copied from the write model.

use super::category::Category;
use super::mix_category::MixCategory;

/// Map a category to a fresh, not yet stored document
pub fn to_document(category: &Category) -> MixCategory {
    MixCategory {
        document_id: None,
        entity_id: category.id,
        name: category.name.clone(),
        description: category.description.clone(),
        display_order: category.display_order,
        children: Vec::new(),
        breadcrumb: Vec::new(),
        version: 0,
    }
}

/// Map a category to the summary embedded in `children` and `breadcrumb`
pub fn to_summary(category: &Category) -> MixCategory {
    to_document(category)
}

/// Copy the category's own fields onto an existing document,
/// leaving identity, version and computed fields untouched
pub fn apply_category(document: &mut MixCategory, category: &Category) {
    document.entity_id = category.id;
    document.name = category.name.clone();
    document.description = category.description.clone();
    document.display_order = category.display_order;
}
