//! Dependency Injection Container
//!
//! Builds every adapter once at startup and wires them into the use case,
//! the outbox relay and the HTTP state.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{EventDispatchError, EventDispatcherPort, OutboxPort};
use crate::application::services::{OutboxRelay, OutboxRelayConfig};
use crate::application::use_cases::{DispatchMode, PlaceOrderUseCase};
use crate::config::Config;
use crate::domain::account::UserRepository;
use crate::domain::catalog::ProductRepository;
use crate::domain::ordering::PricingPolicy;
use crate::infrastructure::auth::{IdentityResolver, TrustedHeaderResolver};
use crate::infrastructure::dispatcher::{
    HttpDispatcherConfig, HttpEventDispatcher, LogEventDispatcher,
};
use crate::infrastructure::http::AppState;
use crate::infrastructure::persistence::{
    InMemoryAccountStore, InMemoryCatalog, SeedData, SeedError,
};

/// Errors raised while wiring the application.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Seed fixture could not be loaded.
    #[error(transparent)]
    Seed(#[from] SeedError),

    /// Event dispatcher could not be built.
    #[error(transparent)]
    Dispatcher(#[from] EventDispatchError),
}

/// Dependency injection container.
///
/// `A` is the account store, which owns both users and the outbox so the
/// cart clear and the event enqueue share one transaction.
pub struct Container<C, A>
where
    C: ProductRepository + 'static,
    A: UserRepository + OutboxPort + 'static,
{
    catalog: Arc<C>,
    accounts: Arc<A>,
    dispatcher: Arc<dyn EventDispatcherPort>,
    identity: Arc<dyn IdentityResolver>,
    pricing: PricingPolicy,
    mode: DispatchMode,
    relay_config: OutboxRelayConfig,
}

impl<C, A> Container<C, A>
where
    C: ProductRepository + 'static,
    A: UserRepository + OutboxPort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(
        catalog: Arc<C>,
        accounts: Arc<A>,
        dispatcher: Arc<dyn EventDispatcherPort>,
        identity: Arc<dyn IdentityResolver>,
        pricing: PricingPolicy,
        mode: DispatchMode,
        relay_config: OutboxRelayConfig,
    ) -> Self {
        Self {
            catalog,
            accounts,
            dispatcher,
            identity,
            pricing,
            mode,
            relay_config,
        }
    }

    /// Get the product catalog.
    pub fn catalog(&self) -> Arc<C> {
        Arc::clone(&self.catalog)
    }

    /// Get the account store.
    pub fn accounts(&self) -> Arc<A> {
        Arc::clone(&self.accounts)
    }

    /// Get the event dispatcher.
    pub fn dispatcher(&self) -> Arc<dyn EventDispatcherPort> {
        Arc::clone(&self.dispatcher)
    }

    /// Configured dispatch mode.
    pub const fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Create a `PlaceOrderUseCase`.
    pub fn place_order_use_case(&self) -> PlaceOrderUseCase<C, A, A, dyn EventDispatcherPort> {
        PlaceOrderUseCase::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.accounts),
            Arc::clone(&self.accounts),
            Arc::clone(&self.dispatcher),
            self.pricing,
            self.mode,
        )
    }

    /// Create the outbox relay.
    pub fn outbox_relay(&self) -> OutboxRelay<A, dyn EventDispatcherPort> {
        OutboxRelay::new(
            Arc::clone(&self.accounts),
            Arc::clone(&self.dispatcher),
            self.relay_config.clone(),
        )
    }

    /// Create the HTTP state.
    pub fn app_state(
        &self,
        version: impl Into<String>,
    ) -> AppState<C, A, A, dyn EventDispatcherPort> {
        AppState {
            place_order: Arc::new(self.place_order_use_case()),
            identity: Arc::clone(&self.identity),
            version: version.into(),
        }
    }
}

impl Container<InMemoryCatalog, InMemoryAccountStore> {
    /// Build the in-memory stores, dispatcher and identity resolver from
    /// configuration.
    pub fn from_config(config: &Config) -> Result<Self, ContainerError> {
        let (catalog, accounts) = match &config.persistence.seed_path {
            Some(path) => {
                let seed = SeedData::load(path)?;
                tracing::info!(
                    path = %path,
                    products = seed.products.len(),
                    users = seed.users.len(),
                    "Loaded seed data"
                );
                seed.into_stores()
            }
            None => {
                tracing::warn!("No seed_path configured, starting with empty stores");
                (InMemoryCatalog::new(), InMemoryAccountStore::new())
            }
        };

        let dispatcher = build_dispatcher(config)?;
        let identity: Arc<dyn IdentityResolver> =
            Arc::new(TrustedHeaderResolver::new(&config.auth.user_id_header));

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(accounts),
            dispatcher,
            identity,
            config.pricing.policy(),
            config.dispatcher.mode,
            config.outbox.relay_config(),
        ))
    }
}

fn build_dispatcher(config: &Config) -> Result<Arc<dyn EventDispatcherPort>, ContainerError> {
    let settings = &config.dispatcher;
    match (settings.base_url(), settings.event_key()) {
        (Some(base_url), Some(event_key)) => {
            let dispatcher = HttpEventDispatcher::new(&HttpDispatcherConfig {
                base_url: base_url.to_string(),
                event_key: event_key.to_string(),
                timeout: Duration::from_millis(settings.timeout_ms),
            })?;
            tracing::info!(base_url = %base_url, "Using HTTP event dispatcher");
            Ok(Arc::new(dispatcher))
        }
        _ => {
            tracing::warn!("No dispatcher base_url configured, events will only be logged");
            Ok(Arc::new(LogEventDispatcher))
        }
    }
}
