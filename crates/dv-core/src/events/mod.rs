use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Dashboard-wide event bus
///
/// The state manager publishes after each operation has fully completed, so
/// subscribers never observe a half-applied transition.
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<SharedHandler>>>>,
}

type SharedHandler = Arc<Mutex<Box<dyn EventHandler>>>;

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common dashboard events
pub mod events {
    use super::Event;
    use crate::dataset::DatasetId;
    use crate::visualization::VisualizationId;

    /// A dataset was registered
    #[derive(Debug, Clone)]
    pub struct DatasetAdded {
        pub id: DatasetId,
        pub name: String,
        pub rows: usize,
        pub columns: usize,
    }

    /// A dataset and every visualization bound to it were removed
    #[derive(Debug, Clone)]
    pub struct DatasetRemoved {
        pub id: DatasetId,
        pub removed_visualizations: Vec<VisualizationId>,
    }

    #[derive(Debug, Clone)]
    pub struct VisualizationAdded {
        pub id: VisualizationId,
        pub dataset_id: DatasetId,
    }

    #[derive(Debug, Clone)]
    pub struct VisualizationRemoved {
        pub id: VisualizationId,
    }

    /// Axes, filter, chart kind or dataset of a visualization changed
    #[derive(Debug, Clone)]
    pub struct VisualizationUpdated {
        pub id: VisualizationId,
    }

    /// A layout batch from the grid surface was applied
    #[derive(Debug, Clone)]
    pub struct LayoutReconciled {
        pub updated: usize,
    }

    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub selected: Option<DatasetId>,
    }

    /// Persisted application settings changed (e.g. theme)
    #[derive(Debug, Clone)]
    pub struct SettingsChanged;

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
        DatasetAdded,
        DatasetRemoved,
        VisualizationAdded,
        VisualizationRemoved,
        VisualizationUpdated,
        LayoutReconciled,
        SelectionChanged,
        SettingsChanged
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers
            .entry(type_id)
            .or_insert_with(Vec::new)
            .push(Arc::new(Mutex::new(handler)));
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn on<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event
    ///
    /// Handlers run after the subscription table is released, so they may
    /// subscribe or publish other events on this bus. A handler must not
    /// publish the event type it is handling.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let snapshot: Vec<SharedHandler> = match self.handlers.lock().get(&type_id) {
            Some(event_handlers) => event_handlers.clone(),
            None => return,
        };

        for handler in snapshot {
            handler.lock().handle(&event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.handlers.lock().len())
            .finish()
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

#[cfg(test)]
mod tests {
    use super::*;
    use super::events::{SelectionChanged, SettingsChanged};

    #[test]
    fn test_typed_subscription_only_sees_its_event() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.on::<SelectionChanged, _>(move |e| sink.lock().push(e.selected.clone()));

        bus.publish(SettingsChanged);
        bus.publish(SelectionChanged { selected: Some("a".into()) });

        assert_eq!(*seen.lock(), vec![Some("a".to_string())]);
    }

    #[test]
    fn test_handlers_may_use_the_bus() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = bus.clone();
        let sink = seen.clone();
        bus.on::<SettingsChanged, _>(move |_| {
            let late = sink.clone();
            inner.on::<SelectionChanged, _>(move |e| late.lock().push(e.selected.clone()));
            inner.publish(SelectionChanged { selected: None });
        });

        bus.publish(SettingsChanged);
        bus.publish(SelectionChanged { selected: Some("b".into()) });

        assert_eq!(*seen.lock(), vec![None, Some("b".to_string())]);
    }
}
