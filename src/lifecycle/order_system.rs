use crate::catalog::{CategoryTreeResolver, PriceAggregator};
use crate::clients::{CategoryClient, CustomerClient, OrderClient, ProductClient};
use crate::config::AppConfig;
use crate::notify::{NotificationDispatcher, NotificationError};
use crate::ordering::OrderWorkflow;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Failed to build notifiers: {0}")]
    Notifications(#[from] NotificationError),

    #[error("Actor task failed: {0}")]
    ActorFailed(String),
}

/// The running system: four actors plus the services built on their clients.
///
/// # Architecture
///
/// - **Category Actor**: the category tree (no dependencies)
/// - **Product Actor**: products; checks categories through a `CategoryClient`
/// - **Customer Actor**: customers (no dependencies)
/// - **Order Actor**: order snapshots (no dependencies)
///
/// [`OrderWorkflow`] coordinates customer, product and order actors;
/// [`PriceAggregator`] reads categories and products.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&AppConfig::default())?;
///
/// let bakery = system.category_client.create_category(bakery_params).await?;
/// let summary = system.aggregator.average_price(bakery).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    pub category_client: CategoryClient,
    pub product_client: ProductClient,
    pub customer_client: CustomerClient,
    pub order_client: OrderClient,
    pub resolver: CategoryTreeResolver,
    pub aggregator: PriceAggregator,
    pub workflow: OrderWorkflow,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Starts every actor, with notification channels built from `config`.
    pub fn new(config: &AppConfig) -> Result<Self, SystemError> {
        let dispatcher = NotificationDispatcher::from_config(&config.notifications)?;
        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Starts every actor with a caller-supplied dispatcher.
    pub fn with_dispatcher(config: &AppConfig, dispatcher: NotificationDispatcher) -> Self {
        let buffer_size = config.actors.buffer_size;

        // 1. Create actors (no dependencies)
        let (category_actor, category_client) = crate::category_actor::new(buffer_size);
        let (product_actor, product_client) = crate::product_actor::new(buffer_size);
        let (customer_actor, customer_client) = crate::customer_actor::new(buffer_size);
        let (order_actor, order_client) = crate::order_actor::new(buffer_size);

        // 2. Start actors with injected context
        let handles = vec![
            tokio::spawn(category_actor.run(())),
            tokio::spawn(product_actor.run(category_client.clone())),
            tokio::spawn(customer_actor.run(())),
            tokio::spawn(order_actor.run(())),
        ];

        // 3. Services over the clients
        let resolver =
            CategoryTreeResolver::new(category_client.clone()).with_max_depth(config.catalog.max_depth);
        let aggregator =
            PriceAggregator::new(resolver.clone(), category_client.clone(), product_client.clone());
        let workflow = OrderWorkflow::new(
            customer_client.clone(),
            product_client.clone(),
            order_client.clone(),
            Arc::new(dispatcher),
        )
        .with_unresolved_policy(config.orders.unresolved_products)
        .with_dispatch_mode(config.orders.dispatch);

        info!(buffer_size, max_depth = ?config.catalog.max_depth, "Order system started");

        Self {
            category_client,
            product_client,
            customer_client,
            order_client,
            resolver,
            aggregator,
            workflow,
            handles,
        }
    }

    /// Waits for background notifications, then drops every client and waits
    /// for the actors to drain and exit.
    ///
    /// Clones handed out earlier keep their actor alive, so they must be
    /// dropped before calling this.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        let Self {
            category_client,
            product_client,
            customer_client,
            order_client,
            resolver,
            aggregator,
            workflow,
            handles,
        } = self;
        workflow.finish_background().await;
        drop((workflow, aggregator, resolver));
        drop((order_client, customer_client, product_client, category_client));

        // The product actor holds a category client; it exits first and
        // releases it, then the category actor follows.
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
