//! # Product Client
//!
//! Provides a high-level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes domain-specific methods.
use super::entity_error;
use crate::model::{CategoryId, Product, ProductCreate, ProductFilter, ProductId, ProductUpdate};
use crate::product_actor::ProductError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<ProductError>(e) {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }

    fn not_found(id: &ProductId) -> Self::Error {
        ProductError::NotFound(id.to_string())
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Every product whose category is in `categories`, in product id order.
    #[instrument(skip(self, categories), fields(categories = categories.len()))]
    pub async fn in_categories(
        &self,
        categories: BTreeSet<CategoryId>,
    ) -> Result<Vec<Product>, ProductError> {
        self.find(ProductFilter::InCategories(categories)).await
    }

    /// Resolves ids in request order. Duplicates repeat, unknown ids are absent.
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn resolve(&self, ids: Vec<ProductId>) -> Result<Vec<Product>, ProductError> {
        self.get_many(ids).await
    }
}
