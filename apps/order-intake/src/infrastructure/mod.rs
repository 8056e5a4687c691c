//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application and domain layers. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `persistence/`: In-memory catalog, users and outbox
//!   - `dispatcher/`: Event API adapters
//!
//! - **Driver Adapters (Inbound)**: Expose application to external world
//!   - `http/`: REST API controllers
//!   - `auth/`: Caller identity from request headers
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod http;
pub mod persistence;
