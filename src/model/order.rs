use super::{CustomerId, Product, ProductId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// One line of an order: the product as it was priced when the order was placed.
///
/// Duplicate product ids in a request become separate lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
}

impl From<&Product> for OrderItem {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
        }
    }
}

/// A persisted purchase. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub products: Vec<OrderItem>,
    pub total: f64,
}

impl Order {
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        Self {
            id,
            customer_id: params.customer_id,
            products: params.products,
            total: params.total,
        }
    }
}

/// Sum of the line prices, in line order.
pub fn order_total(items: &[OrderItem]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer_id: CustomerId,
    pub products: Vec<OrderItem>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderFilter {
    All,
    ByCustomer(CustomerId),
}
