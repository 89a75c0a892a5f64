//! [`ActorEntity`] implementation for [`Product`].
//!
//! The product actor runs with a [`CategoryClient`] as its context, so every
//! create (and every category change) is checked against the category actor.

use super::ProductError;
use crate::category_actor::CategoryError;
use crate::clients::CategoryClient;
use crate::model::{CategoryId, Product, ProductCreate, ProductFilter, ProductId, ProductUpdate};
use actor_framework::{ActorClient, ActorEntity};
use async_trait::async_trait;
use tracing::debug;

fn validate_price(price: f64) -> Result<f64, ProductError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ProductError::InvalidPrice(price))
    }
}

async fn ensure_category(categories: &CategoryClient, id: CategoryId) -> Result<(), ProductError> {
    debug!(category_id = %id, "Checking category");
    match categories.require(id).await {
        Ok(_) => Ok(()),
        Err(CategoryError::NotFound(_)) => Err(ProductError::UnknownCategory(id)),
        Err(e) => Err(ProductError::CategoryLookup(e.to_string())),
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ();
    type ActionResult = ();
    type Filter = ProductFilter;
    type Context = CategoryClient;
    type Error = ProductError;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, Self::Error> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(ProductError::EmptyName);
        }
        let price = validate_price(params.price)?;
        Ok(Self::new(id, name, price, params.category_id))
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        match filter {
            ProductFilter::InCategories(ids) => ids.contains(&self.category_id),
        }
    }

    async fn on_create(&mut self, categories: &CategoryClient) -> Result<(), Self::Error> {
        ensure_category(categories, self.category_id).await
    }

    async fn on_update(
        &mut self,
        update: ProductUpdate,
        categories: &CategoryClient,
    ) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ProductError::EmptyName);
            }
            self.name = name.to_string();
        }
        if let Some(price) = update.price {
            self.price = validate_price(price)?;
        }
        if let Some(category_id) = update.category_id {
            if category_id != self.category_id {
                ensure_category(categories, category_id).await?;
                self.category_id = category_id;
            }
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &CategoryClient) -> Result<(), Self::Error> {
        Ok(())
    }
}
