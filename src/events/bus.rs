//! Listener registry for a single model.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Sender, TrySendError};
use tracing::trace;

use crate::model::Model;

use super::event::{ListenerId, ModelEvent, ALL_EVENTS};
use super::stream::EventStream;

/// Callback run synchronously when a matching event is emitted.
pub type Listener = Arc<dyn Fn(&mut Model, &ModelEvent) + Send + Sync>;

struct ListenerEntry {
    id: ListenerId,
    name: String,
    callback: Listener,
}

#[derive(Debug)]
struct StreamSink {
    tx: Sender<ModelEvent>,
    dropped: Arc<AtomicU64>,
}

/// Listener and stream registry owned by one model.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<ListenerEntry>,
    sinks: Vec<StreamSink>,
}

impl EventBus {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events named `name`, or for every event when
    /// `name` is [`ALL_EVENTS`].
    pub fn on<F>(&mut self, name: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(&mut Model, &ModelEvent) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.listeners.push(ListenerEntry {
            id,
            name: name.into(),
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove one listener. Returns false if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    /// Remove every listener registered under `name`. Returns how many were removed.
    pub fn off_event(&mut self, name: &str) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.name != name);
        before - self.listeners.len()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live streams as of the last emission.
    #[must_use]
    pub fn stream_count(&self) -> usize {
        self.sinks.len()
    }

    /// Open a stream receiving every subsequent event.
    pub fn subscribe(&mut self, capacity: usize) -> EventStream {
        let (tx, rx) = bounded::<ModelEvent>(capacity.max(1));
        let dropped = Arc::new(AtomicU64::new(0));
        self.sinks.push(StreamSink {
            tx,
            dropped: Arc::clone(&dropped),
        });
        EventStream::new(rx, dropped)
    }

    /// Snapshot of the callbacks that should see `event`, in registration order.
    ///
    /// Taking a snapshot lets callbacks register or remove listeners while the
    /// event is being delivered.
    pub(crate) fn listeners_for(&self, event: &ModelEvent) -> Vec<Listener> {
        let name = event.name();
        self.listeners
            .iter()
            .filter(|entry| entry.name == name || entry.name == ALL_EVENTS)
            .map(|entry| Arc::clone(&entry.callback))
            .collect()
    }

    /// Copy `event` into every stream without blocking.
    pub(crate) fn publish(&mut self, event: &ModelEvent) {
        self.sinks.retain(|sink| match sink.tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                sink.dropped.fetch_add(1, Ordering::Relaxed);
                trace!(event = %event, "event stream full, dropping event");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.listeners.iter().map(|entry| entry.name.as_str()).collect();
        f.debug_struct("EventBus")
            .field("listeners", &names)
            .field("streams", &self.sinks.len())
            .finish()
    }
}
