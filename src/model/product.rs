use super::CategoryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "product_{}", self.0)
    }
}

/// A priced catalog item. Belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category_id: CategoryId,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Unique identifier (typically set by the actor system)
    /// * `name` - Product name
    /// * `price` - Unit price, finite and non-negative
    /// * `category_id` - Owning category
    pub fn new(id: ProductId, name: impl Into<String>, price: f64, category_id: CategoryId) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub category_id: CategoryId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Products whose category is any member of the set.
    InCategories(BTreeSet<CategoryId>),
}
