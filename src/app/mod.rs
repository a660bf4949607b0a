#[cfg(feature = "cli")]
pub mod commands;
pub mod render;

use crate::adapters::http::HttpStorefront;
use crate::adapters::notifier::{ConsoleNotifier, TtlNotifier};
use crate::adapters::storage::LocalStorage;
use crate::config::Settings;
use crate::core::auth::AuthController;
use crate::core::basket::VirtualBasketController;
use crate::core::cart::CartController;
use crate::core::catalog::CatalogController;
use crate::core::theme::ThemeController;
use crate::core::wishlist::WishlistController;
use crate::domain::ports::{ConfigProvider, KeyValueStore, Notifier};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use render::Renderer;
use std::sync::Arc;

/// Storage key holding the session `Cookie` header between runs.
pub const SESSION_COOKIE_KEY: &str = "session_cookie";

type Toasts<N> = TtlNotifier<N>;

/// Every page controller wired to one HTTP client, one store and one
/// notifier.
pub struct Storefront<N: Notifier + 'static = ConsoleNotifier> {
    api: Arc<HttpStorefront>,
    storage: Arc<LocalStorage>,
    settings: Settings,
    pub auth: AuthController<HttpStorefront>,
    pub catalog: CatalogController<HttpStorefront>,
    pub cart: CartController<HttpStorefront, Toasts<N>>,
    pub wishlist: WishlistController<HttpStorefront, Toasts<N>>,
    pub basket: VirtualBasketController<HttpStorefront, Toasts<N>>,
    pub theme: ThemeController<LocalStorage>,
}

impl<N: Notifier + 'static> Storefront<N> {
    /// Builds the client and restores any session saved by an earlier run.
    pub async fn connect(settings: Settings, notifier: Arc<N>) -> Result<Self> {
        settings.validate()?;

        let api = Arc::new(HttpStorefront::from_config(&settings)?);
        let storage = Arc::new(LocalStorage::new(settings.state_dir()));
        let notifier = Arc::new(TtlNotifier::new(notifier, settings.notification_ttl()));

        if let Some(cookie) = storage.get(SESSION_COOKIE_KEY).await? {
            tracing::debug!("Restoring saved session for {}", api.base_url());
            api.restore_session_cookie(&cookie);
        }

        Ok(Self {
            auth: AuthController::new(api.clone()),
            catalog: CatalogController::new(api.clone())
                .with_featured_limit(settings.featured_limit()),
            cart: CartController::new(api.clone(), notifier.clone()),
            wishlist: WishlistController::new(api.clone(), notifier.clone()),
            basket: VirtualBasketController::new(api.clone(), notifier),
            theme: ThemeController::new(storage.clone()),
            api,
            storage,
            settings,
        })
    }

    /// Writes the jar's current cookie to storage, or clears the saved one
    /// once the server has dropped the session.
    pub async fn persist_session(&self) -> Result<()> {
        match self.api.session_cookie() {
            Some(cookie) => self.storage.set(SESSION_COOKIE_KEY, &cookie).await,
            None => self.storage.remove(SESSION_COOKIE_KEY).await,
        }
    }

    pub async fn forget_session(&self) -> Result<()> {
        self.storage.remove(SESSION_COOKIE_KEY).await
    }

    pub fn api(&self) -> &HttpStorefront {
        &self.api
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.settings.currency_symbol())
    }
}
