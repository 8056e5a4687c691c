//! Event Dispatcher Adapters
//!
//! Implementations of `EventDispatcherPort`.

mod http;
mod log;

pub use self::http::{HttpDispatcherConfig, HttpEventDispatcher};
pub use self::log::LogEventDispatcher;
