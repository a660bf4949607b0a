//! In-memory stand-in for the storefront server, shared by controller tests.

use crate::domain::model::{
    ApiAck, BasketParse, BasketRequestItem, CartItem, Category, Product, Recommendation,
    SessionStatus, WishlistIds,
};
use crate::domain::ports::{ProductQuery, StorefrontApi};
use crate::utils::error::{Result, StorefrontError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub users: HashMap<String, String>,
    pub logged_in: Option<String>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub cart: Vec<CartItem>,
    pub next_cart_item_id: i64,
    pub wishlist: BTreeSet<i64>,
    pub basket: BasketParse,
    pub recommendation: Recommendation,
    /// cart_add for these ids answers `{success: false}`.
    pub rejected_products: HashSet<i64>,
    /// Every call fails at the transport level.
    pub offline: bool,
    pub wishlist_delay: Option<Duration>,
    pub calls: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeStorefront {
    state: Mutex<FakeState>,
}

pub(crate) fn product(id: i64, name: &str, price: i64) -> Product {
    Product {
        product_id: id,
        product_name: name.to_string(),
        price: Decimal::from(price),
        color: None,
        size: None,
        image_url: None,
        stock: Some(10),
        category_id: Some(1),
        description: None,
    }
}

/// A real reqwest error with no HTTP status, i.e. a transport failure.
pub(crate) fn transport_error() -> StorefrontError {
    let err = reqwest::Client::new()
        .get("http://")
        .build()
        .expect_err("empty host must not build");
    StorefrontError::Http(err)
}

fn not_logged_in() -> StorefrontError {
    StorefrontError::Unauthorized {
        message: Some("Not logged in".to_string()),
    }
}

impl FakeStorefront {
    pub fn new() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state();
            state.next_cart_item_id = 1;
            state.users.insert("alice".to_string(), "secret".to_string());
            state.categories = vec![
                Category {
                    category_id: 1,
                    category_name: "Shirts".to_string(),
                    description: Some("Tops".to_string()),
                },
                Category {
                    category_id: 2,
                    category_name: "Pants".to_string(),
                    description: None,
                },
            ];
            state.products = (1..=10)
                .map(|i| product(i, &format!("Product {}", i), i * 10))
                .collect();
        }
        fake
    }

    pub fn logged_in() -> Self {
        let fake = Self::new();
        fake.state().logged_in = Some("alice".to_string());
        fake
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, call: &str) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(call.to_string());
        if state.offline {
            return Err(transport_error());
        }
        Ok(state)
    }

    fn enter_authenticated(&self, call: &str) -> Result<MutexGuard<'_, FakeState>> {
        let state = self.enter(call)?;
        if state.logged_in.is_none() {
            return Err(not_logged_in());
        }
        Ok(state)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    async fn wishlist_pause(&self) {
        let delay = self.state().wishlist_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl StorefrontApi for FakeStorefront {
    async fn login(&self, username: &str, password: &str) -> Result<ApiAck> {
        let mut state = self.enter("login")?;
        if state.users.get(username).map(String::as_str) == Some(password) {
            state.logged_in = Some(username.to_string());
            Ok(ApiAck {
                success: Some(true),
                message: Some("Login successful".to_string()),
                error: None,
            })
        } else {
            Err(StorefrontError::Unauthorized {
                message: Some("Invalid credentials".to_string()),
            })
        }
    }

    async fn register(&self, username: &str, _email: &str, password: &str) -> Result<ApiAck> {
        let mut state = self.enter("register")?;
        if state.users.contains_key(username) {
            return Err(StorefrontError::Api {
                status: 400,
                message: Some(format!("Duplicate entry '{}'", username)),
            });
        }
        state
            .users
            .insert(username.to_string(), password.to_string());
        Ok(ApiAck {
            success: Some(true),
            message: Some("Registration successful".to_string()),
            error: None,
        })
    }

    async fn check_session(&self) -> Result<SessionStatus> {
        let state = self.enter("check_session")?;
        Ok(SessionStatus {
            logged_in: state.logged_in.is_some(),
            username: state.logged_in.clone(),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.enter("logout")?.logged_in = None;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.enter("categories")?.categories.clone())
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let state = self.enter("products")?;
        Ok(state
            .products
            .iter()
            .filter(|p| p.product_name.contains(&query.search))
            .filter(|p| query.category_id.map_or(true, |c| p.category_id == Some(c)))
            .cloned()
            .collect())
    }

    async fn cart_add(&self, product_id: i64, quantity: u32) -> Result<ApiAck> {
        let mut state = self.enter_authenticated("cart_add")?;
        if state.rejected_products.contains(&product_id) {
            return Err(StorefrontError::Rejected {
                message: "Product unavailable".to_string(),
            });
        }
        let product = state
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .cloned()
            .ok_or_else(|| StorefrontError::Api {
                status: 500,
                message: Some("foreign key constraint fails".to_string()),
            })?;

        match state.cart.iter().position(|i| i.product_id == product_id) {
            Some(index) => state.cart[index].quantity += quantity,
            None => {
                let cart_item_id = state.next_cart_item_id;
                state.next_cart_item_id += 1;
                state.cart.push(CartItem {
                    cart_item_id,
                    product_id,
                    product_name: product.product_name,
                    price: product.price,
                    quantity,
                    color: product.color,
                    size: product.size,
                    image_url: product.image_url,
                });
            }
        }
        Ok(ApiAck {
            success: Some(true),
            message: Some("Added to cart".to_string()),
            error: None,
        })
    }

    async fn cart(&self) -> Result<Vec<CartItem>> {
        Ok(self.enter_authenticated("cart")?.cart.clone())
    }

    async fn cart_update(&self, cart_item_id: i64, quantity: u32) -> Result<()> {
        let mut state = self.enter_authenticated("cart_update")?;
        if let Some(item) = state.cart.iter_mut().find(|i| i.cart_item_id == cart_item_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    async fn cart_remove(&self, cart_item_id: i64) -> Result<()> {
        let mut state = self.enter_authenticated("cart_remove")?;
        state.cart.retain(|i| i.cart_item_id != cart_item_id);
        Ok(())
    }

    async fn cart_count(&self) -> Result<u32> {
        let state = self.enter_authenticated("cart_count")?;
        Ok(state.cart.iter().map(|i| i.quantity).sum())
    }

    async fn basket_parse(&self, _text: &str) -> Result<BasketParse> {
        let state = self.enter_authenticated("basket_parse")?;
        Ok(state.basket.clone())
    }

    async fn basket_recommend(&self, _items: &[BasketRequestItem]) -> Result<Recommendation> {
        let state = self.enter_authenticated("basket_recommend")?;
        Ok(state.recommendation.clone())
    }

    async fn wishlist_ids(&self) -> Result<WishlistIds> {
        let state = self.enter("wishlist_ids")?;
        if state.logged_in.is_none() {
            return Ok(WishlistIds::default());
        }
        Ok(WishlistIds {
            ids: state.wishlist.iter().copied().collect(),
        })
    }

    async fn wishlist_count(&self) -> Result<u32> {
        let state = self.enter("wishlist_count")?;
        if state.logged_in.is_none() {
            return Ok(0);
        }
        Ok(state.wishlist.len() as u32)
    }

    async fn wishlist_add(&self, product_id: i64) -> Result<u32> {
        drop(self.enter_authenticated("wishlist_add")?);
        self.wishlist_pause().await;
        let mut state = self.state();
        state.wishlist.insert(product_id);
        Ok(state.wishlist.len() as u32)
    }

    async fn wishlist_remove(&self, product_id: i64) -> Result<u32> {
        drop(self.enter_authenticated("wishlist_remove")?);
        self.wishlist_pause().await;
        let mut state = self.state();
        state.wishlist.remove(&product_id);
        Ok(state.wishlist.len() as u32)
    }
}
