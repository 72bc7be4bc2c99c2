use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier generated by the document store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Denormalized read-model copy of a Category.
///
/// `children` and `breadcrumb` are computed by the dependency resolver and
/// never copied from the write model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixCategory {
    /// Absent until the document store has inserted the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,

    /// Id of the source Category, unique within the collection
    pub entity_id: i64,

    pub name: String,

    pub description: String,

    pub display_order: i32,

    /// Visible child categories, ordered by display order then id
    #[serde(default)]
    pub children: Vec<MixCategory>,

    /// Ancestor chain, root first, ending with this category
    #[serde(default)]
    pub breadcrumb: Vec<MixCategory>,

    /// Optimistic concurrency token, advanced by the store on every replace
    #[serde(default)]
    pub version: u64,
}

impl MixCategory {
    /// True when both documents carry the same content, ignoring store metadata
    pub fn same_content(&self, other: &MixCategory) -> bool {
        self.entity_id == other.entity_id
            && self.name == other.name
            && self.description == other.description
            && self.display_order == other.display_order
            && self.children == other.children
            && self.breadcrumb == other.breadcrumb
    }
}
