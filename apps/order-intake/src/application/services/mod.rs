//! Application Services
//!
//! Application services coordinate domain logic and infrastructure adapters.
//! They differ from use cases in that they typically run as background tasks.

mod outbox_relay;

pub use outbox_relay::{DrainReport, OutboxRelay, OutboxRelayConfig};
