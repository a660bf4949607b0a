use crate::domain::model::{
    ApiAck, BasketParse, BasketRequestItem, CartItem, Category, Notification, Product,
    Recommendation, SessionStatus, WishlistIds,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Search/category filter for the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: String,
    pub category_id: Option<i64>,
}

/// The storefront REST contract. The HTTP adapter implements it; controllers
/// only see this trait.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<ApiAck>;
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<ApiAck>;
    async fn check_session(&self) -> Result<SessionStatus>;
    async fn logout(&self) -> Result<()>;

    async fn categories(&self) -> Result<Vec<Category>>;
    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>>;

    async fn cart_add(&self, product_id: i64, quantity: u32) -> Result<ApiAck>;
    async fn cart(&self) -> Result<Vec<CartItem>>;
    async fn cart_update(&self, cart_item_id: i64, quantity: u32) -> Result<()>;
    async fn cart_remove(&self, cart_item_id: i64) -> Result<()>;
    async fn cart_count(&self) -> Result<u32>;

    async fn basket_parse(&self, text: &str) -> Result<BasketParse>;
    async fn basket_recommend(&self, items: &[BasketRequestItem]) -> Result<Recommendation>;

    async fn wishlist_ids(&self) -> Result<WishlistIds>;
    async fn wishlist_count(&self) -> Result<u32>;
    /// Returns the wishlist size after the add.
    async fn wishlist_add(&self, product_id: i64) -> Result<u32>;
    /// Returns the wishlist size after the removal.
    async fn wishlist_remove(&self, product_id: i64) -> Result<u32>;
}

/// String key/value persistence, the client-side `localStorage`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn state_dir(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn featured_limit(&self) -> usize;
    fn currency_symbol(&self) -> &str;
    fn notification_ttl(&self) -> Duration;
}
