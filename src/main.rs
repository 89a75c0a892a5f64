//! Demo: seeds a small bakery catalog, places an order and reports the
//! average price of the catalog root, all through the request handlers.

use catalog_orders::api::{Api, ApiResponse};
use catalog_orders::auth::authorizer_from_config;
use catalog_orders::config::AppConfig;
use catalog_orders::lifecycle::{setup_tracing, OrderSystem};
use serde_json::json;
use tracing::{info, warn, Instrument};

/// The `id` of a successful create response.
fn created_id(what: &str, response: &ApiResponse) -> Result<u64, String> {
    if !(200..300).contains(&response.status) {
        return Err(format!("{what} failed with {}: {}", response.status, response.body));
    }
    response.body["id"]
        .as_u64()
        .ok_or_else(|| format!("{what} response has no id: {}", response.body))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    setup_tracing(&config.log_filter);

    info!("Starting order desk demo");

    let system = OrderSystem::new(&config)?;
    let api = Api::new(system, authorizer_from_config(&config.auth));
    let token = config
        .auth
        .tokens
        .first()
        .cloned()
        .unwrap_or_else(|| "demo-token".to_string());

    let (bakery, bread_product) = async {
        let bakery = created_id(
            "bakery category",
            &api.create_category(&json!({ "name": "Bakery" }).to_string()).await,
        )?;
        let bread = created_id(
            "bread category",
            &api.create_category(&json!({ "name": "Bread", "parent_id": bakery }).to_string())
                .await,
        )?;
        let loaf = created_id(
            "loaf product",
            &api.create_product(
                &json!({ "name": "Sourdough Loaf", "price": 3.50, "category_id": bread }).to_string(),
            )
            .await,
        )?;
        created_id(
            "cake product",
            &api.create_product(
                &json!({ "name": "Layer Cake", "price": 5.00, "category_id": bakery }).to_string(),
            )
            .await,
        )?;
        Ok::<_, String>((bakery, loaf))
    }
    .instrument(tracing::info_span!("catalog_seed"))
    .await?;

    let customer = created_id(
        "customer",
        &api.create_customer(
            &json!({ "name": "Ada", "email": "ada@example.com", "phone": "+254700000001" }).to_string(),
        )
        .await,
    )?;

    let authorization = format!("Bearer {token}");
    let order = api
        .create_order(
            Some(authorization.as_str()),
            &json!({ "customer_id": customer, "product_ids": [bread_product, bread_product] }).to_string(),
        )
        .instrument(tracing::info_span!("order_processing"))
        .await;
    if order.status == 201 {
        info!(order = %order.body, "Order placed");
    } else {
        warn!(status = order.status, body = %order.body, "Order rejected");
    }

    let average = api.average_price(&bakery.to_string()).await;
    info!(summary = %average.body, "Average price under Bakery");

    api.shutdown().await?;
    Ok(())
}
