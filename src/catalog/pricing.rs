use super::{CatalogError, CategoryTreeResolver};
use crate::clients::{CategoryClient, ProductClient};
use crate::model::{CategoryId, Product};
use actor_framework::ActorClient;
use serde::Serialize;
use tracing::{info, instrument};

/// Average price over a category's whole subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPriceSummary {
    pub category_id: CategoryId,
    pub category_name: String,
    pub product_count: usize,
    pub average_price: f64,
}

/// Arithmetic mean of the prices. An empty slice averages to `0.0`.
pub fn mean_price(products: &[Product]) -> f64 {
    if products.is_empty() {
        return 0.0;
    }
    let sum: f64 = products.iter().map(|p| p.price).sum();
    sum / products.len() as f64
}

/// Computes [`CategoryPriceSummary`] values from the category and product actors.
#[derive(Clone)]
pub struct PriceAggregator {
    resolver: CategoryTreeResolver,
    categories: CategoryClient,
    products: ProductClient,
}

impl PriceAggregator {
    pub fn new(resolver: CategoryTreeResolver, categories: CategoryClient, products: ProductClient) -> Self {
        Self {
            resolver,
            categories,
            products,
        }
    }

    /// Mean price of every product attached to `category_id` or any of its
    /// descendants.
    #[instrument(skip(self))]
    pub async fn average_price(
        &self,
        category_id: CategoryId,
    ) -> Result<CategoryPriceSummary, CatalogError> {
        let category = self.categories.require(category_id).await?;
        let subtree = self.resolver.descendants_of(category.id).await?;
        let products = self.products.in_categories(subtree).await?;

        let summary = CategoryPriceSummary {
            category_id: category.id,
            category_name: category.name,
            product_count: products.len(),
            average_price: mean_price(&products),
        };
        info!(
            count = summary.product_count,
            average = summary.average_price,
            "Average price computed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    fn priced(id: u32, price: f64) -> Product {
        Product::new(ProductId(id), format!("p{id}"), price, CategoryId(1))
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(mean_price(&[]), 0.0);
    }

    #[test]
    fn test_mean_ignores_order() {
        let forward = vec![priced(1, 3.5), priced(2, 5.0), priced(3, 0.25)];
        let mut backward = forward.clone();
        backward.reverse();
        assert!((mean_price(&forward) - mean_price(&backward)).abs() < 1e-12);
        assert!((mean_price(&forward) - 2.916_666_666_666_667).abs() < 1e-9);
    }
}
