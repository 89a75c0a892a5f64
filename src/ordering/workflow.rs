//! Order placement.
//!
//! An order moves through four stages:
//!
//! ```text
//! Pending -> Validated -> Persisted -> NotificationsAttempted
//! ```
//!
//! Any failure before `Persisted` aborts the request with nothing stored and
//! nobody notified. Once the order actor has accepted the snapshot the request
//! can no longer fail: notification problems only show up in the report.
//!
//! In [`DispatchMode::Background`] the notifications run on tasks the workflow
//! keeps track of; [`OrderWorkflow::finish_background`] waits for them.

use super::{DispatchMode, UnresolvedProductPolicy};
use crate::clients::{CustomerClient, OrderClient, ProductClient};
use crate::customer_actor::CustomerError;
use crate::model::{order_total, CustomerId, Order, OrderCreate, OrderItem, Product, ProductId};
use crate::notify::{NotificationDispatcher, NotificationReport};
use crate::order_actor::OrderError;
use actor_framework::ActorClient;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Pending,
    Validated,
    Persisted,
    NotificationsAttempted,
}

impl Display for OrderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStage::Pending => "pending",
            OrderStage::Validated => "validated",
            OrderStage::Persisted => "persisted",
            OrderStage::NotificationsAttempted => "notifications_attempted",
        };
        f.write_str(name)
    }
}

/// The stored order plus, for inline dispatch, what happened to its notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub notifications: Option<NotificationReport>,
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Coordinates the customer, product and order actors to place an order.
#[derive(Clone)]
pub struct OrderWorkflow {
    customers: CustomerClient,
    products: ProductClient,
    orders: OrderClient,
    notifier: Arc<NotificationDispatcher>,
    unresolved: UnresolvedProductPolicy,
    dispatch: DispatchMode,
    background: Arc<Mutex<JoinSet<()>>>,
}

impl OrderWorkflow {
    pub fn new(
        customers: CustomerClient,
        products: ProductClient,
        orders: OrderClient,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            customers,
            products,
            orders,
            notifier,
            unresolved: UnresolvedProductPolicy::default(),
            dispatch: DispatchMode::default(),
            background: Arc::default(),
        }
    }

    pub fn with_unresolved_policy(mut self, policy: UnresolvedProductPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch = mode;
        self
    }

    /// Places an order for `customer_id` with one line per entry of `product_ids`.
    ///
    /// # Errors
    ///
    /// - `NotFound("customer")` if the customer does not exist.
    /// - `NotFound("product")` under [`UnresolvedProductPolicy::Reject`] when
    ///   any product id is unknown.
    /// - `PersistenceError` if the order actor does not store the order.
    /// - `ActorCommunicationError` if a lookup could not be made.
    #[instrument(
        name = "place_order",
        skip(self, product_ids),
        fields(customer = %customer_id, requested = product_ids.len())
    )]
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        product_ids: Vec<ProductId>,
    ) -> Result<PlacedOrder, OrderError> {
        let stage = OrderStage::Pending;
        info!(%stage, "Processing order");

        let customer = self
            .customers
            .require(customer_id)
            .await
            .map_err(|e| match e {
                CustomerError::NotFound(_) => OrderError::not_found("customer", customer_id),
                other => OrderError::ActorCommunicationError(other.to_string()),
            })?;

        let products = self
            .products
            .resolve(product_ids.clone())
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        self.check_unresolved(&product_ids, &products)?;

        let stage = OrderStage::Validated;
        info!(%stage, items = products.len(), "Order validated");

        let items: Vec<OrderItem> = products.iter().map(OrderItem::from).collect();
        let total = order_total(&items);
        let params = OrderCreate {
            customer_id,
            products: items,
            total,
        };
        let order_id = self.orders.create_order(params.clone()).await?;
        let order = Order::new(order_id, params);

        let stage = OrderStage::Persisted;
        info!(%stage, order_id = %order.id, total = order.total, "Order stored");

        let notifications = match self.dispatch {
            DispatchMode::Inline => Some(self.notifier.dispatch(&order, &customer).await),
            DispatchMode::Background => {
                let notifier = self.notifier.clone();
                let background_order = order.clone();
                let mut tasks = lock(&self.background);
                while tasks.try_join_next().is_some() {}
                tasks.spawn(
                    async move {
                        notifier.dispatch(&background_order, &customer).await;
                    }
                    .in_current_span(),
                );
                debug!(order_id = %order.id, pending = tasks.len(), "Notifications running in background");
                None
            }
        };

        let stage = OrderStage::NotificationsAttempted;
        info!(%stage, order_id = %order.id, "Order placed");

        Ok(PlacedOrder {
            order,
            notifications,
        })
    }

    /// Waits for every background dispatch still running and returns how many
    /// there were. Finished ones are not counted.
    pub async fn finish_background(&self) -> usize {
        let mut tasks = std::mem::take(&mut *lock(&self.background));
        let pending = tasks.len();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Background notification task failed");
            }
        }
        if pending > 0 {
            info!(pending, "Background notifications finished");
        }
        pending
    }

    fn check_unresolved(&self, requested: &[ProductId], found: &[Product]) -> Result<(), OrderError> {
        if requested.len() == found.len() {
            return Ok(());
        }
        let known: HashSet<ProductId> = found.iter().map(|p| p.id).collect();
        let missing: Vec<ProductId> = requested
            .iter()
            .filter(|id| !known.contains(*id))
            .copied()
            .collect();

        match self.unresolved {
            UnresolvedProductPolicy::Drop => {
                warn!(?missing, "Dropping unknown products from order");
                Ok(())
            }
            UnresolvedProductPolicy::Reject => {
                let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
                Err(OrderError::not_found("product", ids.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryId, Customer, OrderId};
    use crate::notify::{
        ChannelOutcome, EmailRecipient, EmailSender, LogSender, NotificationError, OutboundEmail, SmsSender,
    };
    use actor_framework::mock::MockClient;
    use actor_framework::FrameworkError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingSms {
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl SmsSender for CountingSms {
        async fn send_sms(&self, _to: &str, _message: &str) -> Result<(), NotificationError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BrokenEmail;

    #[async_trait]
    impl EmailSender for BrokenEmail {
        async fn send_email(&self, _email: &OutboundEmail) -> Result<(), NotificationError> {
            Err(NotificationError::Transport("smtp down".to_string()))
        }
    }

    struct Mocks {
        customers: MockClient<Customer>,
        products: MockClient<Product>,
        orders: MockClient<Order>,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                customers: MockClient::new(),
                products: MockClient::new(),
                orders: MockClient::new(),
            }
        }

        fn workflow(&self, notifier: NotificationDispatcher) -> OrderWorkflow {
            OrderWorkflow::new(
                CustomerClient::new(self.customers.client()),
                ProductClient::new(self.products.client()),
                OrderClient::new(self.orders.client()),
                Arc::new(notifier),
            )
        }

        fn verify(&self) {
            self.customers.verify();
            self.products.verify();
            self.orders.verify();
        }
    }

    fn ada() -> Customer {
        Customer::new(CustomerId(1), "Ada", "ada@example.com", "+254700000001")
    }

    fn rye() -> Product {
        Product::new(ProductId(1), "Rye", 2.0, CategoryId(1))
    }

    fn counting(sms: Arc<CountingSms>) -> NotificationDispatcher {
        NotificationDispatcher::new(sms, Arc::new(LogSender), EmailRecipient::default(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found_and_nothing_is_stored() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(999)).return_ok(None);
        let sms = Arc::new(CountingSms::default());

        let result = mocks
            .workflow(counting(sms.clone()))
            .place_order(CustomerId(999), vec![ProductId(1)])
            .await;

        assert!(matches!(result, Err(OrderError::NotFound { entity: "customer", .. })));
        assert_eq!(sms.calls.load(Ordering::SeqCst), 0);
        mocks.verify();
    }

    #[tokio::test]
    async fn test_duplicates_are_separate_lines() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(1)).return_ok(Some(ada()));
        mocks.products.expect_get_many().return_ok(vec![rye(), rye()]);
        mocks.orders.expect_create().return_ok(OrderId(1));
        let sms = Arc::new(CountingSms::default());

        let placed = mocks
            .workflow(counting(sms.clone()))
            .place_order(CustomerId(1), vec![ProductId(1), ProductId(1)])
            .await
            .unwrap();

        assert_eq!(placed.order.id, OrderId(1));
        assert_eq!(placed.order.products.len(), 2);
        assert!((placed.order.total - 4.0).abs() < 1e-9);
        assert!(placed.notifications.unwrap().all_delivered());
        assert_eq!(sms.calls.load(Ordering::SeqCst), 1);
        mocks.verify();
    }

    #[tokio::test]
    async fn test_persistence_failure_sends_nothing() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(1)).return_ok(Some(ada()));
        mocks.products.expect_get_many().return_ok(vec![rye()]);
        mocks.orders.expect_create().return_err(FrameworkError::ActorClosed);
        let sms = Arc::new(CountingSms::default());

        let result = mocks
            .workflow(counting(sms.clone()))
            .place_order(CustomerId(1), vec![ProductId(1)])
            .await;

        assert!(matches!(result, Err(OrderError::PersistenceError(_))));
        assert_eq!(sms.calls.load(Ordering::SeqCst), 0);
        mocks.verify();
    }

    #[tokio::test]
    async fn test_notification_failure_still_returns_order() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(1)).return_ok(Some(ada()));
        mocks.products.expect_get_many().return_ok(vec![rye()]);
        mocks.orders.expect_create().return_ok(OrderId(5));
        let notifier = NotificationDispatcher::new(
            Arc::new(LogSender),
            Arc::new(BrokenEmail),
            EmailRecipient::default(),
            Duration::from_secs(1),
        );

        let placed = mocks
            .workflow(notifier)
            .place_order(CustomerId(1), vec![ProductId(1)])
            .await
            .unwrap();

        assert_eq!(placed.order.id, OrderId(5));
        let report = placed.notifications.unwrap();
        assert_eq!(report.sms, ChannelOutcome::Delivered);
        assert!(matches!(report.email, ChannelOutcome::Failed(_)));
        mocks.verify();
    }

    #[tokio::test]
    async fn test_unknown_products_dropped_by_default() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(1)).return_ok(Some(ada()));
        mocks.products.expect_get_many().return_ok(vec![rye()]);
        mocks.orders.expect_create().return_ok(OrderId(1));

        let placed = mocks
            .workflow(NotificationDispatcher::logging(EmailRecipient::default(), Duration::from_secs(1)))
            .place_order(CustomerId(1), vec![ProductId(1), ProductId(77)])
            .await
            .unwrap();

        assert_eq!(placed.order.products.len(), 1);
        assert!((placed.order.total - 2.0).abs() < 1e-9);
        mocks.verify();
    }

    #[tokio::test]
    async fn test_reject_policy_fails_before_persisting() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(1)).return_ok(Some(ada()));
        mocks.products.expect_get_many().return_ok(vec![rye()]);

        let result = mocks
            .workflow(NotificationDispatcher::logging(EmailRecipient::default(), Duration::from_secs(1)))
            .with_unresolved_policy(UnresolvedProductPolicy::Reject)
            .place_order(CustomerId(1), vec![ProductId(1), ProductId(77)])
            .await;

        assert_eq!(result, Err(OrderError::not_found("product", "product_77")));
        mocks.verify();
    }

    #[tokio::test]
    async fn test_background_dispatch_returns_without_report() {
        let mut mocks = Mocks::new();
        mocks.customers.expect_get(CustomerId(1)).return_ok(Some(ada()));
        mocks.products.expect_get_many().return_ok(vec![rye()]);
        mocks.orders.expect_create().return_ok(OrderId(2));
        let sms = Arc::new(CountingSms {
            delay: Some(Duration::from_millis(200)),
            ..Default::default()
        });
        let workflow = mocks
            .workflow(counting(sms.clone()))
            .with_dispatch_mode(DispatchMode::Background);

        let placed = workflow.place_order(CustomerId(1), vec![ProductId(1)]).await.unwrap();
        assert!(placed.notifications.is_none());
        assert_eq!(sms.calls.load(Ordering::SeqCst), 0);

        assert_eq!(workflow.finish_background().await, 1);
        assert_eq!(sms.calls.load(Ordering::SeqCst), 1);
        assert_eq!(workflow.finish_background().await, 0);
        mocks.verify();
    }
}
