//! Place Order Use Case

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::{
    CartClearance, EventDispatchError, EventDispatcherPort, EventEnvelope, OutboxError, OutboxPort,
    OutboxRecord,
};
use crate::domain::account::UserRepository;
use crate::domain::catalog::ProductRepository;
use crate::domain::ordering::{
    OrderCreated, OrderError, OrderLine, OrderQuote, OrderSubmission, PricingPolicy,
};
use crate::domain::shared::{ExternalUserId, OutboxId, RepositoryError, Timestamp};
use crate::observability;

/// When the `order/created` event leaves the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Enqueue the event together with the cart clear; the outbox relay
    /// delivers it. An unknown user records nothing.
    #[default]
    Outbox,
    /// Send the event before looking up the user, then clear the cart. An
    /// unknown user still produces an event.
    Direct,
}

/// Input of one order request.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrderCommand {
    /// Authenticated caller, if any.
    pub user_id: Option<ExternalUserId>,
    /// Raw `address` field of the body.
    pub address: Option<Value>,
    /// Raw `items` field of the body.
    pub items: Option<Value>,
}

/// An accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Id of the emitted event.
    pub event_id: OutboxId,
    /// Price breakdown.
    pub quote: OrderQuote,
}

/// Why an order request failed. `Display` is the client-facing message.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlaceOrderError {
    /// Validation or lookup failure.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Catalog or user store failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Outbox write failure.
    #[error(transparent)]
    Outbox(#[from] OutboxError),

    /// Direct dispatch failure.
    #[error(transparent)]
    Dispatch(#[from] EventDispatchError),
}

impl PlaceOrderError {
    /// Metric label for this failure.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Order(OrderError::InvalidData) => "invalid",
            Self::Order(OrderError::ProductNotFound { .. }) => "product_not_found",
            Self::Order(OrderError::UserNotFound) => "user_not_found",
            Self::Order(OrderError::AmountOutOfRange) => "amount_out_of_range",
            Self::Repository(_) | Self::Outbox(_) | Self::Dispatch(_) => "error",
        }
    }
}

/// Use case for turning a cart submission into an order.
pub struct PlaceOrderUseCase<C, U, O, D>
where
    C: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    catalog: Arc<C>,
    users: Arc<U>,
    outbox: Arc<O>,
    dispatcher: Arc<D>,
    pricing: PricingPolicy,
    mode: DispatchMode,
}

impl<C, U, O, D> PlaceOrderUseCase<C, U, O, D>
where
    C: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    /// Create a new PlaceOrderUseCase.
    pub fn new(
        catalog: Arc<C>,
        users: Arc<U>,
        outbox: Arc<O>,
        dispatcher: Arc<D>,
        pricing: PricingPolicy,
        mode: DispatchMode,
    ) -> Self {
        Self {
            catalog,
            users,
            outbox,
            dispatcher,
            pricing,
            mode,
        }
    }

    /// Dispatch mode in use.
    pub const fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Execute the use case.
    #[tracing::instrument(name = "order.place", skip_all, fields(mode = ?self.mode))]
    pub async fn execute(&self, command: PlaceOrderCommand) -> Result<PlacedOrder, PlaceOrderError> {
        let started = Instant::now();
        let result = self.place(command).await;
        let latency = started.elapsed().as_secs_f64();

        match &result {
            Ok(placed) => {
                observability::record_order_placed("placed", latency);
                observability::record_order_amount(
                    placed.quote.amount.amount().to_f64().unwrap_or_default(),
                );
            }
            Err(e) => {
                observability::record_order_placed(e.outcome(), latency);
                tracing::warn!(error = %e, outcome = e.outcome(), "Order rejected");
            }
        }

        result
    }

    async fn place(&self, command: PlaceOrderCommand) -> Result<PlacedOrder, PlaceOrderError> {
        let user_id = command.user_id.ok_or(OrderError::InvalidData)?;
        let submission = OrderSubmission::parse(command.address, command.items)?;

        let quote = self.price(submission.items()).await?;

        let event_id = OutboxId::generate();
        let (address, items) = submission.into_parts();
        let event = OrderCreated::new(
            user_id.clone(),
            address,
            items,
            quote.amount.amount(),
            Timestamp::now(),
        );
        let envelope = EventEnvelope::order_created(&event_id, &event)?;

        match self.mode {
            DispatchMode::Outbox => {
                let record = OutboxRecord::pending(event_id.clone(), envelope);
                match self.outbox.clear_cart_and_enqueue(&user_id, record).await? {
                    CartClearance::Cleared => {}
                    CartClearance::UserNotFound => return Err(OrderError::UserNotFound.into()),
                }
            }
            DispatchMode::Direct => {
                self.dispatch_now(&envelope).await?;
                self.clear_cart(&user_id).await?;
            }
        }

        tracing::info!(
            user_id = %user_id,
            event_id = %event_id,
            subtotal = %quote.subtotal,
            fee = %quote.fee,
            amount = %quote.amount,
            "Order placed"
        );

        Ok(PlacedOrder { event_id, quote })
    }

    /// Look up every product concurrently. The first miss aborts the order.
    async fn price(&self, lines: &[OrderLine]) -> Result<OrderQuote, PlaceOrderError> {
        let line_totals = try_join_all(lines.iter().map(|line| async move {
            let product = self
                .catalog
                .find_by_id(&line.product)
                .await?
                .ok_or_else(|| OrderError::ProductNotFound {
                    product_id: line.product.clone(),
                })?;
            let total = product
                .line_total(line.quantity)
                .ok_or(OrderError::AmountOutOfRange)?;
            Ok::<_, PlaceOrderError>(total)
        }))
        .await?;

        Ok(self.pricing.quote(line_totals)?)
    }

    async fn dispatch_now(&self, envelope: &EventEnvelope) -> Result<(), PlaceOrderError> {
        match self.dispatcher.dispatch(envelope).await {
            Ok(()) => {
                observability::record_event_dispatch("ok");
                Ok(())
            }
            Err(e) => {
                observability::record_event_dispatch("error");
                Err(e.into())
            }
        }
    }

    async fn clear_cart(&self, user_id: &ExternalUserId) -> Result<(), PlaceOrderError> {
        let mut user = self
            .users
            .find_by_external_id(user_id)
            .await?
            .ok_or(OrderError::UserNotFound)?;
        user.clear_cart();
        self.users.save(&user).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OutboxStatus;
    use crate::domain::account::{CartLine, User};
    use crate::domain::catalog::Product;
    use crate::domain::shared::{Money, ProductId};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    // Mock catalog
    struct MockCatalog {
        products: HashMap<ProductId, Product>,
        fail: bool,
    }

    impl MockCatalog {
        fn with(products: Vec<Product>) -> Self {
            Self {
                products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ProductRepository for MockCatalog {
        async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Unavailable {
                    message: "connection reset".to_string(),
                });
            }
            Ok(self.products.get(id).cloned())
        }
    }

    // Mock user store with an outbox
    #[derive(Default)]
    struct MockStore {
        users: Mutex<HashMap<ExternalUserId, User>>,
        outbox: Mutex<Vec<OutboxRecord>>,
    }

    impl MockStore {
        fn with_user(user: User) -> Self {
            let store = Self::default();
            store.users.lock().insert(user.clerk_id.clone(), user);
            store
        }

        fn cart_of(&self, id: &str) -> Vec<CartLine> {
            self.users.lock()[&ExternalUserId::new(id)].cart_items.clone()
        }
    }

    #[async_trait]
    impl UserRepository for MockStore {
        async fn find_by_external_id(
            &self,
            external_id: &ExternalUserId,
        ) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().get(external_id).cloned())
        }

        async fn save(&self, user: &User) -> Result<(), RepositoryError> {
            self.users.lock().insert(user.clerk_id.clone(), user.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl OutboxPort for MockStore {
        async fn clear_cart_and_enqueue(
            &self,
            user: &ExternalUserId,
            record: OutboxRecord,
        ) -> Result<CartClearance, OutboxError> {
            let mut users = self.users.lock();
            let Some(found) = users.get_mut(user) else {
                return Ok(CartClearance::UserNotFound);
            };
            found.clear_cart();
            self.outbox.lock().push(record);
            Ok(CartClearance::Cleared)
        }

        async fn claim_pending(
            &self,
            _limit: usize,
            _lease: Duration,
        ) -> Result<Vec<OutboxRecord>, OutboxError> {
            Ok(vec![])
        }

        async fn mark_delivered(&self, _id: &OutboxId) -> Result<(), OutboxError> {
            Ok(())
        }

        async fn record_failure(
            &self,
            _id: &OutboxId,
            _error: &str,
            _max_attempts: u32,
        ) -> Result<OutboxStatus, OutboxError> {
            Ok(OutboxStatus::Pending)
        }

        async fn pending_count(&self) -> Result<usize, OutboxError> {
            Ok(self.outbox.lock().len())
        }
    }

    // Dispatcher that records what it was given
    #[derive(Default)]
    struct RecordingDispatcher {
        sent: Mutex<Vec<EventEnvelope>>,
        fail: bool,
    }

    #[async_trait]
    impl EventDispatcherPort for RecordingDispatcher {
        async fn dispatch(&self, envelope: &EventEnvelope) -> Result<(), EventDispatchError> {
            if self.fail {
                return Err(EventDispatchError::ConnectionError {
                    message: "connection refused".to_string(),
                });
            }
            self.sent.lock().push(envelope.clone());
            Ok(())
        }
    }

    type TestUseCase = PlaceOrderUseCase<MockCatalog, MockStore, MockStore, RecordingDispatcher>;

    struct Fixture {
        use_case: TestUseCase,
        store: Arc<MockStore>,
        dispatcher: Arc<RecordingDispatcher>,
    }

    fn shopper() -> User {
        User::new("user_1").with_cart(vec![CartLine {
            product: ProductId::new("P1"),
            quantity: 2,
        }])
    }

    fn fixture_with(
        catalog: MockCatalog,
        store: MockStore,
        dispatcher: RecordingDispatcher,
        mode: DispatchMode,
    ) -> Fixture {
        let store = Arc::new(store);
        let dispatcher = Arc::new(dispatcher);
        let use_case = PlaceOrderUseCase::new(
            Arc::new(catalog),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&dispatcher),
            PricingPolicy::default(),
            mode,
        );
        Fixture {
            use_case,
            store,
            dispatcher,
        }
    }

    fn fixture(mode: DispatchMode) -> Fixture {
        fixture_with(
            MockCatalog::with(vec![
                Product::new("P1", "Headphones", Money::from_units(100)),
                Product::new("P2", "Cable", Money::new(dec!(9.99))),
            ]),
            MockStore::with_user(shopper()),
            RecordingDispatcher::default(),
            mode,
        )
    }

    fn command(user: Option<&str>, items: Value) -> PlaceOrderCommand {
        PlaceOrderCommand {
            user_id: user.map(ExternalUserId::new),
            address: Some(json!("addr_1")),
            items: Some(items),
        }
    }

    #[tokio::test]
    async fn outbox_mode_enqueues_event_and_clears_cart() {
        let f = fixture(DispatchMode::Outbox);

        let placed = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([{"product": "P1", "quantity": 2}]),
            ))
            .await
            .unwrap();

        assert_eq!(placed.quote.amount, Money::from_units(204));
        assert!(f.store.cart_of("user_1").is_empty());
        assert!(f.dispatcher.sent.lock().is_empty());

        let outbox = f.store.outbox.lock();
        assert_eq!(outbox.len(), 1);
        let envelope = &outbox[0].envelope;
        assert_eq!(envelope.id, placed.event_id.as_str());
        assert_eq!(envelope.name, "order/created");
        assert_eq!(envelope.data["userId"], "user_1");
        assert_eq!(envelope.data["address"], "addr_1");
        assert_eq!(envelope.data["amount"], json!(204.0));
        assert_eq!(
            envelope.data["items"],
            json!([{"product": "P1", "quantity": 2}])
        );
    }

    #[tokio::test]
    async fn sums_lines_in_input_order() {
        let f = fixture(DispatchMode::Outbox);

        let placed = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([
                    {"product": "P2", "quantity": 3},
                    {"product": "P1", "quantity": 1},
                ]),
            ))
            .await
            .unwrap();

        // 29.97 + 100 = 129.97, fee floor(2.5994) = 2
        assert_eq!(placed.quote.subtotal, Money::new(dec!(129.97)));
        assert_eq!(placed.quote.fee, Money::from_units(2));
        assert_eq!(placed.quote.amount, Money::new(dec!(131.97)));
    }

    #[tokio::test]
    async fn missing_identity_is_invalid_data() {
        let f = fixture(DispatchMode::Outbox);

        let err = f
            .use_case
            .execute(command(None, json!([{"product": "P1", "quantity": 1}])))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid data provided");
        assert_eq!(err.outcome(), "invalid");
        assert!(f.store.outbox.lock().is_empty());
    }

    #[tokio::test]
    async fn empty_items_is_invalid_data() {
        let f = fixture(DispatchMode::Direct);

        let err = f
            .use_case
            .execute(command(Some("user_1"), json!([])))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid data provided");
        assert!(f.dispatcher.sent.lock().is_empty());
        assert_eq!(f.store.cart_of("user_1").len(), 1);
    }

    #[tokio::test]
    async fn unknown_product_aborts_without_side_effects() {
        let f = fixture(DispatchMode::Direct);

        let err = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([
                    {"product": "P1", "quantity": 1},
                    {"product": "P404", "quantity": 1},
                ]),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Product not found: P404");
        assert_eq!(err.outcome(), "product_not_found");
        assert!(f.dispatcher.sent.lock().is_empty());
        assert_eq!(f.store.cart_of("user_1").len(), 1);
    }

    #[tokio::test]
    async fn outbox_mode_unknown_user_records_nothing() {
        let f = fixture(DispatchMode::Outbox);

        let err = f
            .use_case
            .execute(command(
                Some("ghost"),
                json!([{"product": "P1", "quantity": 1}]),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User not found in database");
        assert!(f.store.outbox.lock().is_empty());
        assert!(f.dispatcher.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn direct_mode_unknown_user_still_emits_event() {
        let f = fixture(DispatchMode::Direct);

        let err = f
            .use_case
            .execute(command(
                Some("ghost"),
                json!([{"product": "P1", "quantity": 1}]),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User not found in database");
        let sent = f.dispatcher.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].data["userId"], "ghost");
    }

    #[tokio::test]
    async fn direct_mode_dispatches_then_clears_cart() {
        let f = fixture(DispatchMode::Direct);

        f.use_case
            .execute(command(
                Some("user_1"),
                json!([{"product": "P1", "quantity": 2}]),
            ))
            .await
            .unwrap();

        assert_eq!(f.dispatcher.sent.lock().len(), 1);
        assert!(f.store.cart_of("user_1").is_empty());
        assert!(f.store.outbox.lock().is_empty());
    }

    #[tokio::test]
    async fn direct_mode_dispatch_failure_keeps_cart() {
        let f = fixture_with(
            MockCatalog::with(vec![Product::new("P1", "", Money::from_units(100))]),
            MockStore::with_user(shopper()),
            RecordingDispatcher {
                fail: true,
                ..Default::default()
            },
            DispatchMode::Direct,
        );

        let err = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([{"product": "P1", "quantity": 1}]),
            ))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.outcome(), "error");
        assert_eq!(f.store.cart_of("user_1").len(), 1);
    }

    #[tokio::test]
    async fn catalog_failure_surfaces_store_error() {
        let mut catalog = MockCatalog::with(vec![]);
        catalog.fail = true;
        let f = fixture_with(
            catalog,
            MockStore::with_user(shopper()),
            RecordingDispatcher::default(),
            DispatchMode::Outbox,
        );

        let err = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([{"product": "P1", "quantity": 1}]),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Store unavailable: connection reset");
    }

    #[tokio::test]
    async fn overflowing_line_total_is_rejected() {
        let f = fixture_with(
            MockCatalog::with(vec![Product::new(
                "P1",
                "Vault",
                Money::new(rust_decimal::Decimal::MAX),
            )]),
            MockStore::with_user(shopper()),
            RecordingDispatcher::default(),
            DispatchMode::Outbox,
        );

        let err = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([{"product": "P1", "quantity": 4_000_000_000_u32}]),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Order amount out of range");
        assert_eq!(err.outcome(), "amount_out_of_range");
        assert!(f.store.outbox.lock().is_empty());
        assert_eq!(f.store.cart_of("user_1").len(), 1);
    }

    #[tokio::test]
    async fn padded_product_id_is_looked_up_verbatim() {
        let f = fixture(DispatchMode::Outbox);

        let err = f
            .use_case
            .execute(command(
                Some("user_1"),
                json!([{"product": "  P1  ", "quantity": 1}]),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Product not found:   P1  ");
        assert!(f.store.outbox.lock().is_empty());
    }

    #[test]
    fn dispatch_mode_deserializes_lowercase() {
        let mode: DispatchMode = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(mode, DispatchMode::Direct);
        assert_eq!(DispatchMode::default(), DispatchMode::Outbox);
    }
}
