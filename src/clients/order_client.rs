use super::entity_error;
use crate::model::{CustomerId, Order, OrderCreate, OrderFilter, OrderId};
use crate::order_actor::OrderError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Customer and product validation happen in the order workflow; this client
/// only stores and reads snapshots.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Stores the snapshot. Any failure here means nothing was committed.
    #[instrument(skip(self, params), fields(customer = %params.customer_id, items = params.products.len()))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!(?params, "create_order called");
        info!("Sending create_order to actor");
        self.inner
            .create(params)
            .await
            .map_err(|e| OrderError::PersistenceError(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn orders_for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, OrderError> {
        self.find(OrderFilter::ByCustomer(customer_id)).await
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<OrderError>(e) {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::not_found("order", id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &OrderId) -> Self::Error {
        OrderError::not_found("order", id)
    }
}
