//! # Store Owner Dashboard
//!
//! Festival stores authenticate with their own token, separate from the user
//! session. A 401/403 on any owner call ends the store session only.

use shared::{Order, OrderStatus, Product, ProductCreateRequest, StoreApplyRequest};
use tracing::{info, warn};

use crate::core::error::{ApiError, AppError, Result};
use crate::core::service::StoreService;

/// Logged-in store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSession {
    pub store_id: String,
    token: String,
}

impl StoreSession {
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// New product form, as typed.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
}

impl ProductForm {
    fn into_request(self) -> Result<ProductCreateRequest> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Product name required".to_string()));
        }
        let price: i64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid price: {}", self.price.trim())))?;
        if price <= 0 {
            return Err(AppError::Validation("Price must be positive".to_string()));
        }
        let image = Some(self.image.trim().to_string()).filter(|s| !s.is_empty());

        Ok(ProductCreateRequest { name, description: self.description.trim().to_string(), image, price })
    }
}

/// Submit a store application. Name, description and phone are required.
pub async fn apply_for_store(store: &dyn StoreService, request: StoreApplyRequest) -> Result<()> {
    if request.store_name.trim().is_empty()
        || request.store_description.trim().is_empty()
        || request.phone_number.trim().is_empty()
    {
        return Err(AppError::Validation("Store name, description and phone number required".to_string()));
    }
    store.store_apply(request).await?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct StoreDashboard {
    session: Option<StoreSession>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl StoreDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&StoreSession> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders still waiting to be handed over.
    pub fn pending_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.status == OrderStatus::Pending)
    }

    pub async fn login(&mut self, store: &dyn StoreService, store_id: &str, password: &str) -> Result<()> {
        let store_id = store_id.trim();
        if store_id.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Store id and password required".to_string()));
        }
        let response = store.store_login(store_id.to_string(), password.to_string()).await?;
        info!(store_id, "Store logged in");
        self.session = Some(StoreSession { store_id: store_id.to_string(), token: response.access_token });
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(store_id = %session.store_id, "Store logged out");
        }
        self.products.clear();
        self.orders.clear();
    }

    /// Reload products and orders.
    pub async fn refresh(&mut self, store: &dyn StoreService) -> Result<()> {
        let token = self.token()?;
        let (products, orders) = tokio::join!(store.my_products(&token), store.my_orders(&token));
        self.products = self.guard(products)?;
        self.orders = self.guard(orders)?;
        Ok(())
    }

    pub async fn add_product(&mut self, store: &dyn StoreService, form: ProductForm) -> Result<Product> {
        let token = self.token()?;
        let request = form.into_request()?;
        let result = store.add_product(&token, request).await;
        let product = self.guard(result)?;
        self.products.push(product.clone());
        Ok(product)
    }

    pub async fn complete_order(&mut self, store: &dyn StoreService, order_id: u64) -> Result<()> {
        let token = self.token()?;
        let result = store.complete_order(&token, order_id).await;
        self.guard(result)?;
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == order_id) {
            order.status = OrderStatus::Completed;
        }
        Ok(())
    }

    fn token(&self) -> Result<String> {
        self.session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| AppError::State("Store not logged in".to_string()))
    }

    /// Drop the store session when the token is rejected.
    fn guard<T>(&mut self, result: std::result::Result<T, ApiError>) -> Result<T> {
        result.map_err(|e| {
            if e.is_auth() {
                warn!(status = ?e.status(), "Store token rejected, logging out");
                self.logout();
            }
            AppError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use shared::StoreLoginResponse;

    use super::*;
    use crate::core::service::mock::MockStore;

    fn product(id: u64, price: i64) -> Product {
        Product { id, name: format!("item-{}", id), description: String::new(), image: None, price }
    }

    fn order(id: u64, status: OrderStatus) -> Order {
        Order { id, status, total_amount: 100, order_items: Vec::new(), created_at: String::new() }
    }

    async fn logged_in(store: &MockStore) -> StoreDashboard {
        store.login.lock().push(Ok(StoreLoginResponse { access_token: "store-token".into() }));
        let mut dashboard = StoreDashboard::new();
        dashboard.login(store, "booth-3", "pw").await.unwrap();
        dashboard
    }

    #[tokio::test]
    async fn login_then_refresh() {
        let store = MockStore::default();
        let mut dashboard = logged_in(&store).await;
        store.products.lock().push(Ok(vec![product(1, 500)]));
        store
            .orders
            .lock()
            .push(Ok(vec![order(10, OrderStatus::Pending), order(11, OrderStatus::Completed)]));

        dashboard.refresh(&store).await.unwrap();
        assert_eq!(dashboard.products().len(), 1);
        assert_eq!(dashboard.pending_orders().count(), 1);
        assert_eq!(dashboard.session().map(|s| s.token()), Some("store-token"));
        assert!(store.calls().contains(&"my_orders:store-token".to_string()));
    }

    #[tokio::test]
    async fn forbidden_clears_store_session() {
        let store = MockStore::default();
        let mut dashboard = logged_in(&store).await;
        store.products.lock().push(Err(ApiError::Unauthorized { status: 403 }));
        store.orders.lock().push(Ok(Vec::new()));

        let err = dashboard.refresh(&store).await.unwrap_err();
        assert!(err.is_auth());
        assert!(!dashboard.is_logged_in());
        assert!(matches!(dashboard.refresh(&store).await, Err(AppError::State(_))));
    }

    #[tokio::test]
    async fn add_product_parses_price() {
        let store = MockStore::default();
        let mut dashboard = logged_in(&store).await;

        let bad = ProductForm { name: "Tea".into(), price: "abc".into(), ..Default::default() };
        assert!(matches!(dashboard.add_product(&store, bad).await, Err(AppError::Validation(_))));

        store.added.lock().push(Ok(product(5, 1500)));
        let form = ProductForm { name: " Tea ".into(), price: " 1500 ".into(), ..Default::default() };
        let added = dashboard.add_product(&store, form).await.unwrap();
        assert_eq!(added.id, 5);
        assert_eq!(dashboard.products().len(), 1);
        assert!(store.calls().contains(&"add_product:store-token:Tea:1500".to_string()));
    }

    #[tokio::test]
    async fn complete_order_marks_local_copy() {
        let store = MockStore::default();
        let mut dashboard = logged_in(&store).await;
        store.products.lock().push(Ok(Vec::new()));
        store.orders.lock().push(Ok(vec![order(10, OrderStatus::Pending)]));
        dashboard.refresh(&store).await.unwrap();

        store.completed.lock().push(Ok(()));
        dashboard.complete_order(&store, 10).await.unwrap();
        assert_eq!(dashboard.pending_orders().count(), 0);
        assert!(store.calls().contains(&"complete:store-token:10".to_string()));
    }

    #[tokio::test]
    async fn apply_requires_fields() {
        let store = MockStore::default();
        let request = StoreApplyRequest {
            store_name: "Booth".into(),
            store_description: String::new(),
            store_image: None,
            phone_number: "010-0000-0000".into(),
        };
        assert!(matches!(apply_for_store(&store, request.clone()).await, Err(AppError::Validation(_))));

        store.apply.lock().push(Ok(()));
        let request = StoreApplyRequest { store_description: "Snacks".into(), ..request };
        apply_for_store(&store, request).await.unwrap();
        assert_eq!(store.calls(), vec!["apply:Booth"]);
    }
}
