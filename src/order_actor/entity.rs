//! [`ActorEntity`] implementation for [`Order`].
//!
//! Orders are write-once: there are no updates and no actions. Customer and
//! product checks happen in [`OrderWorkflow`](crate::ordering::OrderWorkflow)
//! before the create is sent, so the actor only guards the snapshot itself.

use super::OrderError;
use crate::model::{order_total, Order, OrderCreate, OrderFilter, OrderId};
use actor_framework::ActorEntity;
use async_trait::async_trait;

const TOTAL_TOLERANCE: f64 = 1e-9;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = ();
    type ActionResult = ();
    type Filter = OrderFilter;
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if !params.total.is_finite() || params.total < 0.0 {
            return Err(OrderError::ValidationError(format!(
                "invalid total {}",
                params.total
            )));
        }
        let expected = order_total(&params.products);
        if (expected - params.total).abs() > TOTAL_TOLERANCE {
            return Err(OrderError::ValidationError(format!(
                "total {} does not match line items ({expected})",
                params.total
            )));
        }
        Ok(Self::new(id, params))
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        match filter {
            OrderFilter::All => true,
            OrderFilter::ByCustomer(customer_id) => self.customer_id == *customer_id,
        }
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Err(OrderError::ValidationError(
            "orders cannot be modified".to_string(),
        ))
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerId, OrderItem, ProductId};

    fn item(id: u32, price: f64) -> OrderItem {
        OrderItem {
            product_id: ProductId(id),
            name: format!("item {id}"),
            price,
        }
    }

    #[test]
    fn test_total_must_match_items() {
        let params = OrderCreate {
            customer_id: CustomerId(1),
            products: vec![item(1, 2.0), item(1, 2.0)],
            total: 5.0,
        };
        assert!(matches!(
            Order::from_create_params(OrderId(1), params),
            Err(OrderError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_order_is_allowed() {
        let params = OrderCreate {
            customer_id: CustomerId(1),
            products: Vec::new(),
            total: 0.0,
        };
        let order = Order::from_create_params(OrderId(3), params).unwrap();
        assert_eq!(order.id, OrderId(3));
        assert!(order.products.is_empty());
    }
}
