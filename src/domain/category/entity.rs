use serde::{Deserialize, Serialize};

/// Identifier used by `parent_id` to mark a root category
pub const ROOT_PARENT_ID: i64 = 0;

/// A catalog category as held by the relational write model.
/// This is the authoritative record; documents are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier (0 until persisted)
    pub id: i64,

    pub name: String,

    /// Parent category id, `ROOT_PARENT_ID` for roots
    pub parent_id: i64,

    pub display_order: i32,

    pub description: String,

    pub published: bool,

    /// Soft-delete flag, only set through `mark_deleted`
    deleted: bool,
}

impl Category {
    /// Create a new, unpersisted, published root category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            parent_id: ROOT_PARENT_ID,
            display_order: 0,
            description: String::new(),
            published: true,
            deleted: false,
        }
    }

    /// Rebuild a category from persisted state.
    pub(crate) fn restore(
        id: i64,
        name: String,
        parent_id: i64,
        display_order: i32,
        description: String,
        published: bool,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            name,
            parent_id,
            display_order,
            description,
            published,
            deleted,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }

    /// A category deserves a document iff it is published and not deleted
    pub fn is_visible(&self) -> bool {
        self.published && !self.deleted
    }
}
