// src/events/bus/mod.rs

pub mod event_bus;
pub mod registry;

pub use event_bus::{EventBus, EventLogEntry, EventPublisher};
pub use registry::{EventHandler, HandlerRegistry, HandlerRegistryBuilder};
