//! Transport-agnostic request handlers.
//!
//! Each handler takes the raw request parts (path id, JSON body, the
//! `Authorization` header) and returns an [`ApiResponse`] holding a status
//! code and a JSON body. Errors use the body `{"error": "<message>"}`.
//!
//! | Handler | Route it serves | Success |
//! |---------|-----------------|---------|
//! | [`Api::health`] | `GET /health` | 200 |
//! | [`Api::create_category`] | `POST /categories` | 201 |
//! | [`Api::list_categories`] | `GET /categories` | 200 |
//! | [`Api::average_price`] | `GET /categories/{id}/average-price` | 200 |
//! | [`Api::create_product`] | `POST /products` | 201 |
//! | [`Api::create_customer`] | `POST /customers` | 201 |
//! | [`Api::get_customer`] | `GET /customers/{id}` | 200 |
//! | [`Api::update_customer`] | `PATCH /customers/{id}` | 200 |
//! | [`Api::customer_orders`] | `GET /customers/{id}/orders` | 200 |
//! | [`Api::create_order`] | `POST /orders` (bearer token) | 201 |
//! | [`Api::get_order`] | `GET /orders/{id}` | 200 |

mod error;

pub use error::ApiError;

use crate::auth::{bearer_token, Authorizer};
use crate::lifecycle::{OrderSystem, SystemError};
use crate::model::{
    CategoryCreate, CategoryId, CustomerCreate, CustomerId, CustomerUpdate, OrderId, ProductCreate, ProductId,
};
use actor_framework::ActorClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str(body)?)
}

fn parse_id(raw: &str) -> Result<u32, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::ValidationError(format!("Invalid id: {raw}")))
}

fn respond<T: Serialize>(status: u16, result: Result<T, ApiError>) -> ApiResponse {
    let outcome = result.and_then(|value| {
        serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
    });
    match outcome {
        Ok(body) => ApiResponse { status, body },
        Err(e) => {
            if e.status() >= 500 {
                warn!(error = %e, "Request failed");
            }
            e.into_response()
        }
    }
}

/// Request handlers over a running [`OrderSystem`].
pub struct Api {
    system: OrderSystem,
    authorizer: Arc<dyn Authorizer>,
}

impl Api {
    pub fn new(system: OrderSystem, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { system, authorizer }
    }

    pub fn health(&self) -> ApiResponse {
        ApiResponse {
            status: 200,
            body: json!({ "status": "ok" }),
        }
    }

    #[instrument(skip(self, body))]
    pub async fn create_category(&self, body: &str) -> ApiResponse {
        let result = async {
            let params: CategoryCreate = parse_body(body)?;
            let categories = &self.system.category_client;
            let id = categories.create_category(params).await?;
            Ok::<_, ApiError>(categories.require(id).await?)
        };
        respond(201, result.await)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> ApiResponse {
        let result = self.system.category_client.list_categories().await;
        respond(200, result.map_err(ApiError::from))
    }

    #[instrument(skip(self))]
    pub async fn average_price(&self, category_id: &str) -> ApiResponse {
        let result = async {
            let id = CategoryId(parse_id(category_id)?);
            Ok::<_, ApiError>(self.system.aggregator.average_price(id).await?)
        };
        respond(200, result.await)
    }

    #[instrument(skip(self, body))]
    pub async fn create_product(&self, body: &str) -> ApiResponse {
        let result = async {
            let params: ProductCreate = parse_body(body)?;
            let products = &self.system.product_client;
            let id = products.create_product(params).await?;
            Ok::<_, ApiError>(products.require(id).await?)
        };
        respond(201, result.await)
    }

    #[instrument(skip(self, body))]
    pub async fn create_customer(&self, body: &str) -> ApiResponse {
        let result = async {
            let params: CustomerCreate = parse_body(body)?;
            let customers = &self.system.customer_client;
            let id = customers.create_customer(params).await?;
            Ok::<_, ApiError>(customers.require(id).await?)
        };
        respond(201, result.await)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(&self, customer_id: &str) -> ApiResponse {
        let result = async {
            let id = CustomerId(parse_id(customer_id)?);
            Ok::<_, ApiError>(self.system.customer_client.require(id).await?)
        };
        respond(200, result.await)
    }

    /// Changes the fields present in the body; absent fields are kept.
    #[instrument(skip(self, body))]
    pub async fn update_customer(&self, customer_id: &str, body: &str) -> ApiResponse {
        let result = async {
            let id = CustomerId(parse_id(customer_id)?);
            let update: CustomerUpdate = parse_body(body)?;
            Ok::<_, ApiError>(self.system.customer_client.update_customer(id, update).await?)
        };
        respond(200, result.await)
    }

    #[instrument(skip(self))]
    pub async fn customer_orders(&self, customer_id: &str) -> ApiResponse {
        let result = async {
            let id = CustomerId(parse_id(customer_id)?);
            self.system.customer_client.require(id).await?;
            Ok::<_, ApiError>(self.system.order_client.orders_for_customer(id).await?)
        };
        respond(200, result.await)
    }

    /// Requires `Authorization: Bearer <token>`; the body is checked only after
    /// the token is accepted.
    #[instrument(skip(self, authorization, body))]
    pub async fn create_order(&self, authorization: Option<&str>, body: &str) -> ApiResponse {
        let result = async {
            let token = bearer_token(authorization)?;
            self.authorizer.authorize(token).await?;
            let request: CreateOrderRequest = parse_body(body)?;
            let placed = self
                .system
                .workflow
                .place_order(request.customer_id, request.product_ids)
                .await?;
            Ok::<_, ApiError>(placed.order)
        };
        respond(201, result.await)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> ApiResponse {
        let result = async {
            let id = OrderId(parse_id(order_id)?);
            Ok::<_, ApiError>(self.system.order_client.require(id).await?)
        };
        respond(200, result.await)
    }

    /// Stops the underlying actors.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        self.system.shutdown().await
    }
}
