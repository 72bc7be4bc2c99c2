// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events carry a snapshot of the entity as it was persisted
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, MixCategory};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Send + Sync {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! snapshot_event {
    ($(#[$doc:meta])* $name:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            pub event_id: Uuid,
            pub occurred_at: DateTime<Utc>,
            pub $field: $ty,
        }

        impl $name {
            pub fn new($field: $ty) -> Self {
                Self {
                    event_id: Uuid::new_v4(),
                    occurred_at: Utc::now(),
                    $field,
                }
            }
        }

        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($name)
            }
        }
    };
}

// ============================================================================
// WRITE-MODEL EVENTS
// ============================================================================

snapshot_event!(
    /// Emitted after a category row has been inserted
    CategoryCreated, category: Category
);

/// Emitted after a category row has been updated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category: Category,
    /// Parent before the update; differs from `category.parent_id` on a move
    pub previous_parent_id: i64,
}

impl CategoryUpdated {
    pub fn new(category: Category) -> Self {
        let previous_parent_id = category.parent_id;
        Self::moved(category, previous_parent_id)
    }

    pub fn moved(category: Category, previous_parent_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            category,
            previous_parent_id,
        }
    }

    pub fn is_move(&self) -> bool {
        self.previous_parent_id != self.category.parent_id
    }
}

impl DomainEvent for CategoryUpdated {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CategoryUpdated"
    }
}

snapshot_event!(
    /// Emitted after a category has been soft-deleted
    CategoryDeleted, category: Category
);

// ============================================================================
// READ-MODEL (DOCUMENT) EVENTS
// ============================================================================

snapshot_event!(
    /// Emitted after a document has been inserted
    MixCategoryCreated, document: MixCategory
);

snapshot_event!(
    /// Emitted after a document has been replaced with new content
    MixCategoryUpdated, document: MixCategory
);

snapshot_event!(
    /// Emitted after a document has been removed from the store
    MixCategoryDeleted, document: MixCategory
);
