use catalog_orders::api::Api;
use catalog_orders::auth::StaticTokenAuthorizer;
use catalog_orders::config::AppConfig;
use catalog_orders::lifecycle::OrderSystem;
use catalog_orders::notify::{EmailRecipient, NotificationDispatcher};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const TOKEN: &str = "Bearer s3cret";

fn start() -> Api {
    let dispatcher = NotificationDispatcher::logging(EmailRecipient::default(), Duration::from_secs(1));
    let system = OrderSystem::with_dispatcher(&AppConfig::default(), dispatcher);
    Api::new(system, Arc::new(StaticTokenAuthorizer::new(["s3cret"])))
}

#[tokio::test]
async fn test_health() {
    let api = start();
    let response = api.health();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "status": "ok" }));
    api.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_catalog_and_order_round_trip() {
    let api = start();

    let bakery = api.create_category(r#"{"name": "Bakery"}"#).await;
    assert_eq!(bakery.status, 201);
    assert_eq!(bakery.body["name"], "Bakery");
    let bakery_id = bakery.body["id"].as_u64().unwrap();

    let bread = api
        .create_category(&json!({ "name": "Bread", "parent_id": bakery_id }).to_string())
        .await;
    assert_eq!(bread.body["parent_id"], bakery_id);
    let bread_id = bread.body["id"].as_u64().unwrap();

    let loaf = api
        .create_product(&json!({ "name": "Bread", "price": 3.5, "category_id": bread_id }).to_string())
        .await;
    assert_eq!(loaf.status, 201);
    api.create_product(&json!({ "name": "Cake", "price": 5.0, "category_id": bakery_id }).to_string())
        .await;

    let average = api.average_price(&bakery_id.to_string()).await;
    assert_eq!(average.status, 200);
    assert_eq!(average.body["category_id"], bakery_id);
    assert_eq!(average.body["category_name"], "Bakery");
    assert_eq!(average.body["average_price"], 4.25);

    let customer = api
        .create_customer(r#"{"name": "Ada", "email": "ada@example.com", "phone": "+254700000001"}"#)
        .await;
    assert_eq!(customer.status, 201);
    let customer_id = customer.body["id"].as_u64().unwrap();

    let order_body = json!({
        "customer_id": customer_id,
        "product_ids": [loaf.body["id"], loaf.body["id"]]
    })
    .to_string();
    let order = api.create_order(Some(TOKEN), &order_body).await;
    assert_eq!(order.status, 201);
    assert_eq!(order.body["total"], 7.0);
    assert_eq!(order.body["products"].as_array().unwrap().len(), 2);

    let order_id = order.body["id"].as_u64().unwrap();
    let fetched = api.get_order(&order_id.to_string()).await;
    assert_eq!(fetched.body, order.body);

    let history = api.customer_orders(&customer_id.to_string()).await;
    assert_eq!(history.body.as_array().unwrap().len(), 1);

    let listed = api.list_categories().await;
    assert_eq!(listed.body.as_array().unwrap().len(), 2);

    api.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_order_requires_valid_bearer_token() {
    let api = start();
    let body = r#"{"customer_id": 1, "product_ids": []}"#;

    assert_eq!(api.create_order(None, body).await.status, 401);
    assert_eq!(api.create_order(Some("s3cret"), body).await.status, 401);
    assert_eq!(api.create_order(Some("Bearer wrong"), body).await.status, 401);

    api.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_error_statuses() {
    let api = start();

    let malformed = api.create_category("{not json").await;
    assert_eq!(malformed.status, 400);
    assert!(malformed.body["error"].is_string());

    let orphan = api.create_category(r#"{"name": "Bread", "parent_id": 41}"#).await;
    assert_eq!(orphan.status, 404);

    let bad_price = api
        .create_product(r#"{"name": "Gold Bar", "price": -3.0, "category_id": 1}"#)
        .await;
    assert_eq!(bad_price.status, 400);

    assert_eq!(api.average_price("abc").await.status, 400);
    assert_eq!(api.average_price("77").await.status, 404);
    assert_eq!(api.get_customer("12").await.status, 404);

    let ghost = api
        .create_order(Some(TOKEN), r#"{"customer_id": 999, "product_ids": [1]}"#)
        .await;
    assert_eq!(ghost.status, 404);

    api.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_customer_update() {
    let api = start();
    let created = api.create_customer(r#"{"name": "Ada", "email": "ada@example.com"}"#).await;
    let id = created.body["id"].as_u64().unwrap().to_string();

    let updated = api.update_customer(&id, r#"{"phone": " +254700000009 "}"#).await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["phone"], "+254700000009");
    assert_eq!(updated.body["name"], "Ada");

    let blank = api.update_customer(&id, r#"{"name": "   "}"#).await;
    assert_eq!(blank.status, 400);
    assert_eq!(api.get_customer(&id).await.body["name"], "Ada");

    assert_eq!(api.update_customer("31", r#"{"name": "Grace"}"#).await.status, 404);

    api.shutdown().await.unwrap();
}
