use crate::domain::model::{Badge, Cart, Navigation, Notification};
use crate::domain::ports::{Notifier, StorefrontApi};
use crate::utils::error::{Result, StorefrontError};
use crate::utils::validation::validate_quantity;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartOutcome {
    pub added: bool,
    /// Refreshed badge; `None` when nothing was added or the refresh failed.
    pub badge: Option<Badge>,
    pub navigation: Option<Navigation>,
}

impl AddToCartOutcome {
    fn not_added(navigation: Option<Navigation>) -> Self {
        Self {
            added: false,
            badge: None,
            navigation,
        }
    }
}

pub struct CartController<A: StorefrontApi, N: Notifier> {
    api: Arc<A>,
    notifier: Arc<N>,
}

impl<A: StorefrontApi, N: Notifier> CartController<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>) -> Self {
        Self { api, notifier }
    }

    pub async fn add_to_cart(&self, product_id: i64, quantity: u32) -> AddToCartOutcome {
        if let Err(e) = validate_quantity(quantity) {
            self.notifier
                .notify(Notification::error(e.user_friendly_message()));
            return AddToCartOutcome::not_added(None);
        }

        match self.api.cart_add(product_id, quantity).await {
            Ok(_) => {
                tracing::debug!("Added product {} x{} to cart", product_id, quantity);
                self.notifier
                    .notify(Notification::success("Product added to cart!"));
                AddToCartOutcome {
                    added: true,
                    badge: self.badge().await,
                    navigation: None,
                }
            }
            Err(StorefrontError::Unauthorized { .. }) => {
                self.notifier
                    .notify(Notification::warning("Please login to add items to cart"));
                AddToCartOutcome::not_added(Some(Navigation::Redirect("/login".to_string())))
            }
            Err(e) => {
                tracing::error!("Error adding to cart: {}", e);
                let message = match e.server_message() {
                    Some(message) if !message.is_empty() => message.to_string(),
                    _ => "Failed to add item to cart".to_string(),
                };
                self.notifier.notify(Notification::error(message));
                AddToCartOutcome::not_added(None)
            }
        }
    }

    /// Current cart badge. A failed refresh is logged and yields `None`.
    pub async fn badge(&self) -> Option<Badge> {
        match self.api.cart_count().await {
            Ok(count) => Some(Badge::new(count)),
            Err(e) => {
                tracing::error!("Error updating cart badge: {}", e);
                None
            }
        }
    }

    pub async fn load_cart(&self) -> Result<Cart> {
        let items = self.api.cart().await?;
        Ok(Cart::new(items))
    }

    /// Sets a line's quantity. Zero removes the line.
    pub async fn update_quantity(&self, cart_item_id: i64, quantity: u32) -> Result<Option<Badge>> {
        if quantity == 0 {
            return self.remove_item(cart_item_id).await;
        }

        if let Err(e) = self.api.cart_update(cart_item_id, quantity).await {
            tracing::error!("Error updating cart item {}: {}", cart_item_id, e);
            self.notifier
                .notify(Notification::error("Failed to update cart"));
            return Err(e);
        }

        self.notifier.notify(Notification::info("Cart updated"));
        Ok(self.badge().await)
    }

    pub async fn remove_item(&self, cart_item_id: i64) -> Result<Option<Badge>> {
        if let Err(e) = self.api.cart_remove(cart_item_id).await {
            tracing::error!("Error removing cart item {}: {}", cart_item_id, e);
            self.notifier
                .notify(Notification::error("Failed to remove item"));
            return Err(e);
        }

        self.notifier.notify(Notification::info("Item removed"));
        Ok(self.badge().await)
    }
}
