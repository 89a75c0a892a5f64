use catalog_orders::catalog::CatalogError;
use catalog_orders::config::AppConfig;
use catalog_orders::lifecycle::OrderSystem;
use catalog_orders::model::{CategoryCreate, CategoryId, CategoryUpdate, ProductCreate, ProductUpdate};
use catalog_orders::notify::{EmailRecipient, NotificationDispatcher};
use catalog_orders::product_actor::ProductError;
use std::time::Duration;

fn start() -> OrderSystem {
    let dispatcher = NotificationDispatcher::logging(EmailRecipient::default(), Duration::from_secs(1));
    OrderSystem::with_dispatcher(&AppConfig::default(), dispatcher)
}

async fn category(system: &OrderSystem, name: &str, parent: Option<CategoryId>) -> CategoryId {
    system
        .category_client
        .create_category(CategoryCreate {
            name: name.to_string(),
            parent_id: parent,
        })
        .await
        .unwrap()
}

async fn product(system: &OrderSystem, name: &str, price: f64, category_id: CategoryId) {
    system
        .product_client
        .create_product(ProductCreate {
            name: name.to_string(),
            price,
            category_id,
        })
        .await
        .unwrap();
}

/// Bakery -> Bread; a loaf in Bread, a cake directly in Bakery.
#[tokio::test]
async fn test_average_covers_descendants() {
    let system = start();
    let bakery = category(&system, "Bakery", None).await;
    let bread = category(&system, "Bread", Some(bakery)).await;
    product(&system, "Bread", 3.50, bread).await;
    product(&system, "Cake", 5.00, bakery).await;

    let summary = system.aggregator.average_price(bakery).await.unwrap();
    assert_eq!(summary.category_name, "Bakery");
    assert_eq!(summary.product_count, 2);
    assert!((summary.average_price - 4.25).abs() < 1e-9);

    // Bread alone sees only its own product.
    let bread_summary = system.aggregator.average_price(bread).await.unwrap();
    assert_eq!(bread_summary.product_count, 1);
    assert!((bread_summary.average_price - 3.50).abs() < 1e-9);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_subtree_averages_zero() {
    let system = start();
    let empty = category(&system, "Empty", None).await;
    category(&system, "Also Empty", Some(empty)).await;

    let summary = system.aggregator.average_price(empty).await.unwrap();
    assert_eq!(summary.product_count, 0);
    assert_eq!(summary.average_price, 0.0);

    system.shutdown().await.unwrap();
}

/// Eighteen nested levels with the product at the bottom.
#[tokio::test]
async fn test_deep_tree_resolves_with_default_config() {
    let system = start();
    let root = category(&system, "L0", None).await;
    let mut leaf = root;
    for level in 1..18 {
        leaf = category(&system, &format!("L{level}"), Some(leaf)).await;
    }
    product(&system, "Deep", 8.0, leaf).await;

    let ids = system.resolver.resolve_descendants(root).await.unwrap();
    assert_eq!(ids.len(), 18);

    let summary = system.aggregator.average_price(root).await.unwrap();
    assert_eq!(summary.product_count, 1);
    assert!((summary.average_price - 8.0).abs() < 1e-9);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let system = start();

    let result = system.aggregator.average_price(CategoryId(404)).await;
    assert!(matches!(result, Err(CatalogError::NotFound(_))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reparenting_moves_products_between_subtrees() {
    let system = start();
    let bakery = category(&system, "Bakery", None).await;
    let dairy = category(&system, "Dairy", None).await;
    let cheese = category(&system, "Cheesecake", Some(bakery)).await;
    product(&system, "Cheesecake", 6.0, cheese).await;

    assert_eq!(system.aggregator.average_price(bakery).await.unwrap().product_count, 1);

    system
        .category_client
        .update_category(
            cheese,
            CategoryUpdate {
                parent_id: Some(Some(dairy)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(system.aggregator.average_price(bakery).await.unwrap().product_count, 0);
    assert_eq!(system.aggregator.average_price(dairy).await.unwrap().product_count, 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let system = start();

    let result = system
        .product_client
        .create_product(ProductCreate {
            name: "Orphan".to_string(),
            price: 1.0,
            category_id: CategoryId(9),
        })
        .await;
    assert_eq!(result, Err(ProductError::UnknownCategory(CategoryId(9))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_product_update_reprices_and_moves() {
    let system = start();
    let bakery = category(&system, "Bakery", None).await;
    let dairy = category(&system, "Dairy", None).await;
    let butter = system
        .product_client
        .create_product(ProductCreate {
            name: "Butter".to_string(),
            price: 2.0,
            category_id: bakery,
        })
        .await
        .unwrap();

    let moved = system
        .product_client
        .update_product(
            butter,
            ProductUpdate {
                price: Some(2.5),
                category_id: Some(dairy),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category_id, dairy);
    assert!((moved.price - 2.5).abs() < 1e-9);
    assert_eq!(system.aggregator.average_price(bakery).await.unwrap().product_count, 0);

    let rejected = system
        .product_client
        .update_product(
            butter,
            ProductUpdate {
                price: Some(-1.0),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(rejected, Err(ProductError::InvalidPrice(-1.0)));

    let stray = system
        .product_client
        .update_product(
            butter,
            ProductUpdate {
                category_id: Some(CategoryId(99)),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(stray, Err(ProductError::UnknownCategory(CategoryId(99))));

    system.shutdown().await.unwrap();
}
