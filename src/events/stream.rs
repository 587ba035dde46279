use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::error::{ModelError, ModelResult};

use super::event::ModelEvent;

/// A subscription stream for model events.
///
/// Dropping the stream unsubscribes it; the model prunes it on its next emission.
#[derive(Debug)]
pub struct EventStream {
    rx: Receiver<ModelEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventStream {
    pub(crate) fn new(rx: Receiver<ModelEvent>, dropped: Arc<AtomicU64>) -> Self {
        Self { rx, dropped }
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> ModelResult<ModelEvent> {
        self.rx.recv().map_err(|_| ModelError::Disconnected {
            path: "event_stream".to_string(),
        })
    }

    /// Receive the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> ModelResult<ModelEvent> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => ModelError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            RecvTimeoutError::Disconnected => ModelError::Disconnected {
                path: "event_stream".to_string(),
            },
        })
    }

    /// Receive an already-queued event, if any.
    #[must_use]
    pub fn try_recv(&self) -> Option<ModelEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every queued event.
    #[must_use]
    pub fn drain(&self) -> Vec<ModelEvent> {
        self.rx.try_iter().collect()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Returns true if no event is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Events lost because the stream was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::options::SetOptions;

    #[test]
    fn test_drain_takes_everything() {
        let (tx, rx) = bounded(4);
        let stream = EventStream::new(rx, Arc::new(AtomicU64::new(0)));
        let all = ModelEvent::ChangeAll {
            options: SetOptions::default(),
        };
        tx.send(all.clone()).unwrap();
        tx.send(all.clone()).unwrap();

        assert_eq!(stream.len(), 2);
        assert_eq!(stream.drain(), vec![all.clone(), all]);
        assert!(stream.is_empty());
    }

    #[test]
    fn test_recv_timeout_reports_timeout() {
        let (_tx, rx) = bounded::<ModelEvent>(1);
        let stream = EventStream::new(rx, Arc::new(AtomicU64::new(0)));
        let err = stream.recv_timeout(Duration::from_millis(5)).unwrap_err();
        assert!(matches!(err, ModelError::Timeout { duration_ms: 5 }));
    }

    #[test]
    fn test_recv_after_sender_gone_is_disconnected() {
        let (tx, rx) = bounded::<ModelEvent>(1);
        drop(tx);
        let stream = EventStream::new(rx, Arc::new(AtomicU64::new(0)));
        assert!(matches!(stream.recv(), Err(ModelError::Disconnected { .. })));
    }
}
