//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! Domain repositories (`ProductRepository`, `UserRepository`) live with their
//! bounded contexts; the ports here cover event delivery.

mod event_dispatcher_port;
mod outbox_port;

pub use event_dispatcher_port::{
    EventDispatchError, EventDispatcherPort, EventEnvelope, NoOpEventDispatcher,
};
pub use outbox_port::{CartClearance, OutboxError, OutboxPort, OutboxRecord, OutboxStatus};
