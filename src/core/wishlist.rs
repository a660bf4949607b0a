use crate::domain::model::{Badge, Notification};
use crate::domain::ports::{Notifier, StorefrontApi};
use crate::utils::error::StorefrontError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const HEART_ADDED: &str = "❤️";
pub const HEART_EMPTY: &str = "🤍";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeartState {
    pub added: bool,
    pub busy: bool,
}

impl HeartState {
    pub fn glyph(&self) -> &'static str {
        if self.added {
            HEART_ADDED
        } else {
            HEART_EMPTY
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added { count: u32 },
    Removed { count: u32 },
    /// A request for this heart was already in flight.
    Ignored,
    /// The heart kept its previous state.
    Failed,
}

/// Wishlist hearts plus the header badge. Each heart allows one request in
/// flight at a time.
pub struct WishlistController<A: StorefrontApi, N: Notifier> {
    api: Arc<A>,
    notifier: Arc<N>,
    hearts: Mutex<HashMap<i64, HeartState>>,
    badge: Mutex<Option<Badge>>,
}

impl<A: StorefrontApi, N: Notifier> WishlistController<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>) -> Self {
        Self {
            api,
            notifier,
            hearts: Mutex::new(HashMap::new()),
            badge: Mutex::new(None),
        }
    }

    fn hearts(&self) -> MutexGuard<'_, HashMap<i64, HeartState>> {
        self.hearts.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_badge(&self, count: u32) {
        *self.badge.lock().unwrap_or_else(|e| e.into_inner()) = Some(Badge::new(count));
    }

    pub fn badge(&self) -> Option<Badge> {
        *self.badge.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn heart(&self, product_id: i64) -> HeartState {
        self.hearts().get(&product_id).copied().unwrap_or_default()
    }

    pub fn is_added(&self, product_id: i64) -> bool {
        self.heart(product_id).added
    }

    /// Marks the hearts on the page from the saved ids and loads the badge.
    /// Either request may fail independently; failures are logged.
    pub async fn preload(&self, product_ids: &[i64]) {
        match self.api.wishlist_ids().await {
            Ok(saved) => {
                let mut hearts = self.hearts();
                for id in product_ids {
                    hearts.entry(*id).or_default().added = saved.ids.contains(id);
                }
            }
            Err(e) => tracing::error!("Wishlist preload error: {}", e),
        }

        match self.api.wishlist_count().await {
            Ok(count) => self.set_badge(count),
            Err(e) => tracing::error!("Wishlist count error: {}", e),
        }
    }

    /// Claims the heart for a request. Returns its current membership and a
    /// guard that releases the heart, or `None` if it is already busy.
    fn begin(&self, product_id: i64) -> Option<(bool, BusyGuard<'_>)> {
        let mut hearts = self.hearts();
        let heart = hearts.entry(product_id).or_default();
        if heart.busy {
            return None;
        }
        heart.busy = true;
        Some((
            heart.added,
            BusyGuard {
                hearts: &self.hearts,
                product_id,
            },
        ))
    }

    fn set_added(&self, product_id: i64, added: bool) {
        self.hearts().entry(product_id).or_default().added = added;
    }

    pub async fn toggle(&self, product_id: i64) -> ToggleOutcome {
        let Some((was_added, _busy)) = self.begin(product_id) else {
            tracing::debug!("Ignoring toggle for busy heart {}", product_id);
            return ToggleOutcome::Ignored;
        };

        let result = if was_added {
            self.api.wishlist_remove(product_id).await
        } else {
            self.api.wishlist_add(product_id).await
        };

        match result {
            Ok(count) => {
                self.set_added(product_id, !was_added);
                self.set_badge(count);
                if was_added {
                    self.notifier
                        .notify(Notification::info("Removed from wishlist"));
                    ToggleOutcome::Removed { count }
                } else {
                    self.notifier
                        .notify(Notification::success("Added to wishlist ✓"));
                    ToggleOutcome::Added { count }
                }
            }
            Err(e) => {
                tracing::error!("Wishlist toggle for {} failed: {}", product_id, e);
                self.notifier
                    .notify(Notification::error(failure_text(&e, "Action failed")));
                ToggleOutcome::Failed
            }
        }
    }

    /// Remove button on the wishlist page. Returns true when the card should
    /// be dropped.
    pub async fn remove_from_page(&self, product_id: i64) -> bool {
        match self.api.wishlist_remove(product_id).await {
            Ok(count) => {
                self.hearts().remove(&product_id);
                self.set_badge(count);
                self.notifier
                    .notify(Notification::info("Removed from wishlist"));
                true
            }
            Err(e) => {
                tracing::error!("Wishlist removal for {} failed: {}", product_id, e);
                self.notifier
                    .notify(Notification::error(failure_text(&e, "Failed to remove")));
                false
            }
        }
    }
}

/// Clears a heart's busy flag on drop, so a cancelled toggle releases it too.
struct BusyGuard<'a> {
    hearts: &'a Mutex<HashMap<i64, HeartState>>,
    product_id: i64,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut hearts = self.hearts.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(heart) = hearts.get_mut(&self.product_id) {
            heart.busy = false;
        }
    }
}

fn failure_text(error: &StorefrontError, fallback: &str) -> String {
    if error.is_network() {
        "Network error".to_string()
    } else {
        fallback.to_string()
    }
}
