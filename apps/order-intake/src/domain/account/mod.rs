//! Account Bounded Context
//!
//! Local user records keyed by the external identity reference. Order intake
//! may only mutate a user's cart.

pub mod repository;
pub mod user;

pub use repository::UserRepository;
pub use user::{CartLine, User};
