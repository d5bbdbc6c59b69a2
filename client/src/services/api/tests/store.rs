use shared::{OrderCreateRequest, OrderLine, OrderStatus};

use super::*;
use crate::core::error::ApiError;
use crate::services::api::store;

#[tokio::test]
async fn owner_calls_use_store_token() {
    let backend = FakeBackend::start(&[("/store/my-products", 200, r#"[{"id":1,"name":"Tea","price":300}]"#)]).await;
    let (client, _session) = signed_in(backend.base_url(), "user-token");

    let products = store::my_products(&client, "store-token").await.unwrap();
    assert_eq!(products[0].price, 300);
    assert_eq!(backend.last().authorization.as_deref(), Some("Bearer store-token"));
}

#[tokio::test]
async fn rejected_store_token_keeps_user_session() {
    let backend = FakeBackend::start(&[("/store/my-orders", 403, "")]).await;
    let (client, session) = signed_in(backend.base_url(), "user-token");

    let err = store::my_orders(&client, "stale-store-token").await.unwrap_err();
    assert!(err.is_auth());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn complete_order_ignores_body() {
    let backend = FakeBackend::start(&[("/store/orders/10/complete", 200, "")]).await;
    let (client, _session) = client_for(backend.base_url());

    store::complete_order(&client, "store-token", 10).await.unwrap();
    let request = backend.last();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/store/orders/10/complete");
}

#[tokio::test]
async fn place_order_is_anonymous() {
    let backend = FakeBackend::start(&[(
        "/store/booth-3/orders",
        201,
        r#"{"id":7,"status":"PENDING","totalAmount":600}"#,
    )])
    .await;
    let (client, _session) = signed_in(backend.base_url(), "user-token");

    let request = OrderCreateRequest {
        user_id: "u-9".into(),
        order_items: vec![OrderLine { product_id: 1, quantity: 2 }],
    };
    let order = store::place_order(&client, "booth-3", &request).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let recorded = backend.last();
    assert_eq!(recorded.authorization, None);
    let body: serde_json::Value = serde_json::from_str(&recorded.body).unwrap();
    assert_eq!(body["userId"], "u-9");
    assert_eq!(body["orderItems"][0]["productId"], 1);
}

#[tokio::test]
async fn unknown_store_uses_default_message() {
    let backend = FakeBackend::start(&[]).await;
    let (client, _session) = client_for(backend.base_url());

    let err = store::store_products(&client, "missing").await.unwrap_err();
    assert_eq!(err, ApiError::Application { status: 404, message: "Failed to fetch products".into() });
}

#[tokio::test]
async fn store_id_is_one_path_segment() {
    let backend = FakeBackend::start(&[("/store/a%2Fb%3Fc/products", 200, r#"[{"id":1,"name":"Tea","price":300}]"#)]).await;
    let (client, _session) = client_for(backend.base_url());

    let products = store::store_products(&client, "a/b?c").await.unwrap();
    assert_eq!(products.len(), 1);
    let request = backend.last();
    assert_eq!(request.path, "/store/a%2Fb%3Fc/products");
    assert_eq!(request.query, None);
}

#[tokio::test]
async fn base_path_is_kept() {
    let backend = FakeBackend::start(&[("/api/store/booth-3/products", 200, "[]")]).await;
    let (client, _session) = client_for(format!("{}/api/", backend.base_url()));

    store::store_products(&client, "booth-3").await.unwrap();
    assert_eq!(backend.last().path, "/api/store/booth-3/products");
}
