use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// Engine-wide event bus.
///
/// Each event type holds at most one handler per role; subscribing again
/// under the same role replaces the previous handler.
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<TypeId, Vec<(&'static str, Box<dyn EventHandler>)>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common engine events
pub mod events {
    use super::Event;
    use crate::analytics::GraphStats;
    use crate::model::Entity;

    /// A new graph model was installed
    #[derive(Debug, Clone)]
    pub struct ModelLoaded {
        pub entity_count: usize,
        pub relationship_count: usize,
    }

    /// A full layout pass finished
    #[derive(Debug, Clone)]
    pub struct LayoutComputed {
        pub entity_count: usize,
        pub timeline_length: f32,
    }

    /// A filter pass finished
    #[derive(Debug, Clone)]
    pub struct VisibilityChanged {
        pub visible_entities: usize,
        pub hidden_entities: usize,
    }

    /// The selection moved to an entity, or was cleared
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub entity: Option<Entity>,
    }

    /// Statistics for the currently visible subgraph
    #[derive(Debug, Clone)]
    pub struct StatsComputed {
        pub stats: GraphStats,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        ModelLoaded,
        LayoutComputed,
        VisibilityChanged,
        SelectionChanged,
        StatsComputed
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type under `role`, replacing any
    /// handler already registered for that role
    pub fn subscribe<E: Event>(&self, role: &'static str, handler: Box<dyn EventHandler>) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        let slots = handlers.entry(type_id).or_default();
        match slots.iter_mut().find(|(r, _)| *r == role) {
            Some(slot) => slot.1 = handler,
            None => slots.push((role, handler)),
        }
    }

    /// Subscribe with a closure that receives the concrete event type
    pub fn on<E, F>(&self, role: &'static str, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(
            role,
            handler_from_fn(move |event| {
                if let Some(event) = event.as_any().downcast_ref::<E>() {
                    f(event);
                }
            }),
        );
    }

    /// Remove the handler registered for `role`
    pub fn unsubscribe<E: Event>(&self, role: &'static str) {
        if let Some(slots) = self.handlers.lock().get_mut(&TypeId::of::<E>()) {
            slots.retain(|(r, _)| *r != role);
        }
    }

    /// Publish an event. Handlers must not publish on the same bus.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for (_, handler) in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
