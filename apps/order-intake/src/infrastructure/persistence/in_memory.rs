//! In-memory catalog and account store.
//!
//! Products, users and outbox records live in process memory, optionally
//! seeded from a YAML fixture at startup. The account store keeps users and
//! outbox records behind one lock so the cart clear and the event enqueue
//! commit together.
//!
//! Only undelivered records are kept in the outbox. Delivered records are
//! dropped on acknowledgement; records that exhaust their attempts move to a
//! bounded dead-letter list.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::application::ports::{
    CartClearance, OutboxError, OutboxPort, OutboxRecord, OutboxStatus,
};
use crate::domain::account::{User, UserRepository};
use crate::domain::catalog::{Product, ProductRepository};
use crate::domain::shared::{ExternalUserId, OutboxId, ProductId, RepositoryError, Timestamp};

/// In-memory implementation of `ProductRepository`.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `products`.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.add(product);
        }
        catalog
    }

    /// Add or replace a product.
    pub fn add(&self, product: Product) {
        self.products.write().insert(product.id.clone(), product);
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.read().get(id).cloned())
    }
}

/// Failed records kept for inspection. Oldest are evicted first.
pub const DEAD_LETTER_CAPACITY: usize = 1_000;

#[derive(Debug, Default)]
struct AccountState {
    users: HashMap<ExternalUserId, User>,
    // Undelivered records by enqueue sequence, so claims stay FIFO
    outbox: BTreeMap<u64, OutboxRecord>,
    outbox_index: HashMap<OutboxId, u64>,
    next_seq: u64,
    dead_letters: VecDeque<OutboxRecord>,
}

impl AccountState {
    fn enqueue(&mut self, record: OutboxRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.outbox_index.insert(record.id.clone(), seq);
        self.outbox.insert(seq, record);
    }

    fn remove(&mut self, id: &OutboxId) -> Option<OutboxRecord> {
        let seq = self.outbox_index.remove(id)?;
        self.outbox.remove(&seq)
    }

    fn record_mut(&mut self, id: &OutboxId) -> Result<&mut OutboxRecord, OutboxError> {
        self.outbox_index
            .get(id)
            .and_then(|seq| self.outbox.get_mut(seq))
            .ok_or_else(|| OutboxError::RecordNotFound { id: id.clone() })
    }

    fn bury(&mut self, record: OutboxRecord) {
        if self.dead_letters.len() == DEAD_LETTER_CAPACITY {
            self.dead_letters.pop_front();
        }
        self.dead_letters.push_back(record);
    }
}

/// In-memory users plus the transactional outbox.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    state: Mutex<AccountState>,
}

impl InMemoryAccountStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            for user in users {
                state.users.insert(user.clerk_id.clone(), user);
            }
        }
        store
    }

    /// Number of users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    /// Snapshot of undelivered outbox records, oldest first.
    #[must_use]
    pub fn outbox_records(&self) -> Vec<OutboxRecord> {
        self.state.lock().outbox.values().cloned().collect()
    }

    /// Snapshot of records that exhausted their attempts, oldest first.
    #[must_use]
    pub fn dead_letters(&self) -> Vec<OutboxRecord> {
        self.state.lock().dead_letters.iter().cloned().collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryAccountStore {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.lock().users.get(external_id).cloned())
    }

    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        self.state
            .lock()
            .users
            .insert(user.clerk_id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl OutboxPort for InMemoryAccountStore {
    async fn clear_cart_and_enqueue(
        &self,
        user: &ExternalUserId,
        record: OutboxRecord,
    ) -> Result<CartClearance, OutboxError> {
        let mut state = self.state.lock();
        let Some(found) = state.users.get_mut(user) else {
            return Ok(CartClearance::UserNotFound);
        };
        found.clear_cart();
        state.enqueue(record);
        Ok(CartClearance::Cleared)
    }

    async fn claim_pending(
        &self,
        limit: usize,
        lease: Duration,
    ) -> Result<Vec<OutboxRecord>, OutboxError> {
        let now = Timestamp::now();
        let lease_until = now.plus(lease);
        let mut state = self.state.lock();

        Ok(state
            .outbox
            .values_mut()
            .filter(|r| r.status.is_claimable(now))
            .take(limit)
            .map(|r| {
                r.status = OutboxStatus::InFlight { lease_until };
                r.clone()
            })
            .collect())
    }

    async fn mark_delivered(&self, id: &OutboxId) -> Result<(), OutboxError> {
        self.state
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| OutboxError::RecordNotFound { id: id.clone() })
    }

    async fn record_failure(
        &self,
        id: &OutboxId,
        error: &str,
        max_attempts: u32,
    ) -> Result<OutboxStatus, OutboxError> {
        let mut state = self.state.lock();
        let record = state.record_mut(id)?;
        record.attempts += 1;
        record.last_error = Some(error.to_string());
        if record.attempts < max_attempts {
            record.status = OutboxStatus::Pending;
            return Ok(OutboxStatus::Pending);
        }

        record.status = OutboxStatus::Failed;
        if let Some(failed) = state.remove(id) {
            state.bury(failed);
        }
        Ok(OutboxStatus::Failed)
    }

    async fn pending_count(&self) -> Result<usize, OutboxError> {
        Ok(self.state.lock().outbox.len())
    }
}
