//! # Festival Store Endpoints
//!
//! Owner calls authenticate with the store token from [`store_login`]; kiosk
//! calls are anonymous.

use shared::{
    Order, OrderCreateRequest, Product, ProductCreateRequest, StoreApplyRequest, StoreLoginRequest,
    StoreLoginResponse,
};

use super::client::{ApiClient, Auth};
use crate::core::error::ApiError;

/// Apply to open a store.
#[tracing::instrument(skip(client, request), fields(store_name = %request.store_name))]
pub async fn store_apply(client: &ApiClient, request: &StoreApplyRequest) -> Result<(), ApiError> {
    client
        .post_ack(&["store", "apply"], Some(request), Auth::Anonymous, "Store application failed")
        .await
}

/// Login as a store owner.
#[tracing::instrument(skip(client, password), fields(store_id = %store_id))]
pub async fn store_login(client: &ApiClient, store_id: String, password: String) -> Result<StoreLoginResponse, ApiError> {
    let request = StoreLoginRequest { store_id, password };
    client
        .post_json(&["store", "login"], &request, Auth::Anonymous, "Store login failed")
        .await
}

/// Products of the logged-in store.
pub async fn my_products(client: &ApiClient, store_token: &str) -> Result<Vec<Product>, ApiError> {
    client
        .get_json(&["store", "my-products"], &[], Auth::Bearer(store_token), "Failed to fetch products")
        .await
}

/// Orders received by the logged-in store.
pub async fn my_orders(client: &ApiClient, store_token: &str) -> Result<Vec<Order>, ApiError> {
    client
        .get_json(&["store", "my-orders"], &[], Auth::Bearer(store_token), "Failed to fetch orders")
        .await
}

/// List a new product.
pub async fn add_product(
    client: &ApiClient,
    store_token: &str,
    request: &ProductCreateRequest,
) -> Result<Product, ApiError> {
    client
        .post_json(&["store", "products"], request, Auth::Bearer(store_token), "Failed to add product")
        .await
}

/// Mark an order as handed over.
pub async fn complete_order(client: &ApiClient, store_token: &str, order_id: u64) -> Result<(), ApiError> {
    let order_id = order_id.to_string();
    client
        .post_ack::<()>(
            &["store", "orders", &order_id, "complete"],
            None,
            Auth::Bearer(store_token),
            "Failed to complete order",
        )
        .await
}

/// Public product list of a store (kiosk view).
pub async fn store_products(client: &ApiClient, store_id: &str) -> Result<Vec<Product>, ApiError> {
    client
        .get_json(
            &["store", store_id, "products"],
            &[],
            Auth::Anonymous,
            "Failed to fetch products",
        )
        .await
}

/// Place a kiosk order for a scanned user.
#[tracing::instrument(skip(client, request), fields(store_id = %store_id, user_id = %request.user_id, lines = request.order_items.len()))]
pub async fn place_order(client: &ApiClient, store_id: &str, request: &OrderCreateRequest) -> Result<Order, ApiError> {
    client
        .post_json(
            &["store", store_id, "orders"],
            request,
            Auth::Anonymous,
            "Failed to place order",
        )
        .await
}
