//! Ordering Bounded Context
//!
//! Turns a cart submission into a priced `order/created` event:
//!
//! - [`submission`]: boundary validation of the submitted address and items
//! - [`pricing`]: subtotal and fee calculation
//! - [`events`]: the event handed to the dispatcher
//! - [`errors`]: domain failures with their client-facing messages

pub mod errors;
pub mod events;
pub mod pricing;
pub mod submission;

pub use errors::OrderError;
pub use events::OrderCreated;
pub use pricing::{OrderQuote, PricingPolicy};
pub use submission::{OrderLine, OrderSubmission};
