// src/events/bus/event_bus.rs
//
// Core event bus implementation.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers execute immediately in registration order
// 2. Fail-fast - the first handler error aborts delivery and is returned
// 3. Observable - every emission is logged
// 4. Type-safe - events are strongly typed
// 5. Re-entrant - handlers may publish further events while being dispatched

use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};

use crate::error::{AppError, AppResult};
use crate::events::bus::registry::{HandlerInstance, HandlerRegistry, Subscription};
use crate::events::types::DomainEvent;
use crate::settings::CascadeConfig;

thread_local! {
    static PUBLISH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Tracks how deeply publishes are nested on the current thread
struct DepthGuard;

impl DepthGuard {
    fn enter(max_depth: usize) -> AppResult<Self> {
        PUBLISH_DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > max_depth {
                return Err(AppError::CascadeDepthExceeded { depth: max_depth });
            }
            depth.set(next);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        PUBLISH_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// The Event Bus
///
/// Central coordination point for all domain events. Handlers come from a
/// `HandlerRegistry` installed once at startup; their instances are created
/// on first dispatch and reused afterwards.
pub struct EventBus {
    registry: OnceLock<HandlerRegistry>,

    /// Lazily created handler instances, keyed by handler type
    instances: RwLock<HashMap<TypeId, HandlerInstance>>,

    /// Most recent emissions, oldest first
    event_log: RwLock<VecDeque<EventLogEntry>>,

    config: CascadeConfig,
}

/// A logged event for debugging and tracing
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            registry: OnceLock::new(),
            instances: RwLock::new(HashMap::new()),
            event_log: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Install the handler registry. Allowed exactly once.
    pub fn install(&self, registry: HandlerRegistry) -> AppResult<()> {
        self.registry
            .set(registry)
            .map_err(|_| AppError::Other("Event handlers are already installed".to_string()))
    }

    /// Publish an event
    ///
    /// Handlers subscribed to `E` run one after another in registration
    /// order. The first error stops delivery to the remaining handlers and
    /// is returned to the caller.
    pub fn publish<E>(&self, event: &E) -> AppResult<()>
    where
        E: DomainEvent + 'static,
    {
        let _depth = DepthGuard::enter(self.config.max_publish_depth)?;

        let subscriptions = self
            .registry
            .get()
            .map(|registry| registry.subscriptions_for(TypeId::of::<E>()))
            .unwrap_or(&[]);

        self.record(event, subscriptions.len());

        for subscription in subscriptions {
            let handler = self.instance_for(subscription)?;
            (subscription.invoke)(handler.as_ref(), event as &dyn Any).map_err(|e| {
                log::debug!(
                    "[EVENT] {} aborted in {}: {}",
                    event.event_type(),
                    subscription.handler_name,
                    e
                );
                e
            })?;
        }

        Ok(())
    }

    fn record<E: DomainEvent>(&self, event: &E, handler_count: usize) {
        let entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count,
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            entry.event_type,
            entry.event_id,
            entry.handler_count
        );

        let mut log = self.event_log.write().unwrap_or_else(PoisonError::into_inner);
        if self.config.event_log_capacity == 0 {
            return;
        }
        while log.len() >= self.config.event_log_capacity {
            log.pop_front();
        }
        log.push_back(entry);
    }

    /// Fetch the cached handler instance, creating it on first use.
    /// No lock is held once the instance is returned.
    fn instance_for(&self, subscription: &Subscription) -> AppResult<HandlerInstance> {
        {
            let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(instance) = instances.get(&subscription.handler_type) {
                return Ok(Arc::clone(instance));
            }
        }

        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(instance) = instances.get(&subscription.handler_type) {
            return Ok(Arc::clone(instance));
        }

        let instance = self
            .registry
            .get()
            .and_then(|registry| registry.create(subscription.handler_type))
            .ok_or_else(|| {
                AppError::Other(format!("No factory for handler {}", subscription.handler_name))
            })?;
        log::debug!("[EVENT] Instantiated handler {}", subscription.handler_name);
        instances.insert(subscription.handler_type, Arc::clone(&instance));
        Ok(instance)
    }

    /// Get the event log (for debugging)
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Clear the event log
    pub fn clear_event_log(&self) {
        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of subscribers for a specific event type
    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.registry
            .get()
            .map(|registry| registry.subscriber_count::<E>())
            .unwrap_or(0)
    }

    /// Number of handler instances created so far
    pub fn instantiated_handler_count(&self) -> usize {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CascadeConfig::default())
    }
}

/// Publishing handle held by services.
///
/// The bus owns the handlers, and the handlers own the services, so services
/// only keep a weak reference back to the bus.
#[derive(Clone)]
pub struct EventPublisher {
    bus: Weak<EventBus>,
}

impl EventPublisher {
    pub fn new(bus: &Arc<EventBus>) -> Self {
        Self {
            bus: Arc::downgrade(bus),
        }
    }

    /// A publisher not attached to any bus; every publish is dropped
    pub fn detached() -> Self {
        Self { bus: Weak::new() }
    }

    pub fn publish<E>(&self, event: &E) -> AppResult<()>
    where
        E: DomainEvent + 'static,
    {
        match self.bus.upgrade() {
            Some(bus) => bus.publish(event),
            None => {
                log::warn!(
                    "[EVENT] {} dropped: event bus is no longer available",
                    event.event_type()
                );
                Ok(())
            }
        }
    }
}
