//! # Store Kiosk
//!
//! Customers build a cart from the store's products and pay by having the
//! kiosk scan the QR code shown in their wallet. The QR payload identifies
//! the paying user; the order is charged to them server-side.

use serde_json::Value;
use shared::{Order, OrderCreateRequest, OrderLine, Product};
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::core::service::StoreService;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// Products picked at the kiosk, in the order they were first added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem { product: product.clone(), quantity: 1 }),
        }
    }

    /// Remove one unit; the line disappears with its last unit.
    pub fn remove(&mut self, product_id: u64) {
        if let Some(pos) = self.items.iter().position(|item| item.product.id == product_id) {
            if self.items[pos].quantity > 1 {
                self.items[pos].quantity -= 1;
            } else {
                self.items.remove(pos);
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total price in coins.
    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .map(|item| item.product.price * i64::from(item.quantity))
            .sum()
    }

    pub fn lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|item| OrderLine { product_id: item.product.id, quantity: item.quantity })
            .collect()
    }
}

/// User id carried by a wallet QR code.
///
/// A JSON object contributes its `userId` or `id`; any other text is taken
/// as the id itself.
pub fn parse_qr_payload(payload: &str) -> String {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => ["userId", "id"]
            .iter()
            .find_map(|field| match map.get(*field) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| payload.to_string()),
        Ok(_) => payload.to_string(),
        Err(_) => payload.trim().to_string(),
    }
}

/// Kiosk session for one store.
pub struct Kiosk {
    store_id: String,
    products: Vec<Product>,
    cart: Cart,
}

impl Kiosk {
    pub fn new(store_id: impl Into<String>) -> Self {
        Self { store_id: store_id.into(), products: Vec::new(), cart: Cart::new() }
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub async fn load_products(&mut self, store: &dyn StoreService) -> Result<&[Product]> {
        self.products = store.store_products(&self.store_id).await?;
        Ok(&self.products)
    }

    /// Charge the cart to the user in `qr_payload`. The cart is kept when
    /// the order fails.
    pub async fn checkout(&mut self, store: &dyn StoreService, qr_payload: &str) -> Result<Order> {
        if self.cart.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }
        let user_id = parse_qr_payload(qr_payload);
        if user_id.is_empty() {
            return Err(AppError::Validation("QR code does not identify a user".to_string()));
        }

        let request = OrderCreateRequest { user_id: user_id.clone(), order_items: self.cart.lines() };
        let total = self.cart.total();
        match store.place_order(&self.store_id, request).await {
            Ok(order) => {
                info!(store_id = %self.store_id, user_id = %user_id, order_id = order.id, total, "Kiosk order placed");
                self.cart.clear();
                Ok(order)
            }
            Err(e) => {
                warn!(store_id = %self.store_id, user_id = %user_id, error = %e, "Kiosk order failed");
                Err(e.into())
            }
        }
    }
}
