// src/events/mod.rs
//
// Internal Event System - Public API

pub mod bus;
pub mod handlers;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Write model
    CategoryCreated,
    CategoryDeleted,
    CategoryUpdated,
    // Read model
    MixCategoryCreated,
    MixCategoryDeleted,
    MixCategoryUpdated,
};

pub use bus::{EventBus, EventHandler, EventLogEntry, EventPublisher, HandlerRegistry};

pub use handlers::{build_sync_registry, CategoryEventHandler, MixCategoryEventHandler};
