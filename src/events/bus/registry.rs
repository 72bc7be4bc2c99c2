// src/events/bus/registry.rs
//
// Explicit handler registry.
//
// Built once at startup with a builder: every handler type gets a factory,
// every event type gets an ordered list of subscribed handler types. The
// registry is immutable once installed on the bus.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::events::types::DomainEvent;

/// A handler for one event type. A single handler type may implement this
/// for several event types and is then instantiated once for all of them.
pub trait EventHandler<E: DomainEvent>: Send + Sync + 'static {
    fn handle(&self, event: &E) -> AppResult<()>;
}

/// Type-erased, lazily created handler instance
pub(crate) type HandlerInstance = Arc<dyn Any + Send + Sync>;

type HandlerFactory = Box<dyn Fn() -> HandlerInstance + Send + Sync>;

type InvokeFn = fn(&(dyn Any + Send + Sync), &dyn Any) -> AppResult<()>;

/// One (event type -> handler type) binding
pub(crate) struct Subscription {
    pub(crate) handler_type: TypeId,
    pub(crate) handler_name: &'static str,
    pub(crate) invoke: InvokeFn,
}

fn invoke<E, H>(instance: &(dyn Any + Send + Sync), event: &dyn Any) -> AppResult<()>
where
    E: DomainEvent + 'static,
    H: EventHandler<E>,
{
    let handler = instance.downcast_ref::<H>().ok_or_else(|| {
        AppError::Other(format!("Handler instance is not a {}", type_name::<H>()))
    })?;
    let event = event
        .downcast_ref::<E>()
        .ok_or_else(|| AppError::Other(format!("Event is not a {}", type_name::<E>())))?;
    handler.handle(event)
}

pub struct HandlerRegistry {
    factories: HashMap<TypeId, HandlerFactory>,
    subscriptions: HashMap<TypeId, Vec<Subscription>>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// Handlers subscribed to `event_type`, in registration order
    pub(crate) fn subscriptions_for(&self, event_type: TypeId) -> &[Subscription] {
        self.subscriptions
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn create(&self, handler_type: TypeId) -> Option<HandlerInstance> {
        self.factories.get(&handler_type).map(|factory| factory())
    }

    /// Number of handlers subscribed to `E`
    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.subscriptions_for(TypeId::of::<E>()).len()
    }
}

#[derive(Default)]
pub struct HandlerRegistryBuilder {
    factories: HashMap<TypeId, HandlerFactory>,
    subscriptions: HashMap<TypeId, Vec<Subscription>>,
}

impl HandlerRegistryBuilder {
    /// Declare how to construct handler type `H`.
    /// Registering a factory twice keeps the later one.
    pub fn factory<H, F>(mut self, factory: F) -> Self
    where
        H: Send + Sync + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.factories.insert(
            TypeId::of::<H>(),
            Box::new(move || Arc::new(factory()) as HandlerInstance),
        );
        self
    }

    /// Append `H` to the handlers of event `E`
    pub fn subscribe<E, H>(mut self) -> Self
    where
        E: DomainEvent + 'static,
        H: EventHandler<E>,
    {
        self.subscriptions
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Subscription {
                handler_type: TypeId::of::<H>(),
                handler_name: type_name::<H>(),
                invoke: invoke::<E, H>,
            });
        self
    }

    /// Fails when a subscribed handler type has no factory
    pub fn build(self) -> AppResult<HandlerRegistry> {
        for subscription in self.subscriptions.values().flatten() {
            if !self.factories.contains_key(&subscription.handler_type) {
                return Err(AppError::invalid_input(format!(
                    "No factory registered for handler {}",
                    subscription.handler_name
                )));
            }
        }

        Ok(HandlerRegistry {
            factories: self.factories,
            subscriptions: self.subscriptions,
        })
    }
}
