//! Model events.
//!
//! Listeners registered on a model run synchronously, in registration order,
//! and receive the model mutably so they may write back into it. Streams are
//! the non-reentrant alternative: a bounded channel that receives a copy of
//! every event without ever blocking the emitter.

/// Listener registry and stream fan-out.
pub mod bus;
/// Event type definitions.
pub mod event;
/// Subscriber stream handle.
pub mod stream;

pub use bus::{EventBus, Listener};
pub use event::{ListenerId, ModelEvent, ALL_EVENTS};
pub use stream::EventStream;
