use crate::domain::model::{
    Badge, BasketParse, BasketRequestItem, Combo, Notification, Recommendation,
};
use crate::domain::ports::{Notifier, StorefrontApi};
use crate::utils::error::{Result, StorefrontError};
use std::sync::Arc;
use tokio::task::JoinSet;

pub const BEST_MATCH_LABEL: &str = "Best Match";

/// Result of a free-text basket request.
#[derive(Debug, Clone, PartialEq)]
pub enum BasketOutcome {
    /// Blank input; nothing was sent.
    EmptyInput,
    Results(BasketResults),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasketResults {
    pub parsed: BasketParse,
}

impl BasketResults {
    /// The server lists its best combo first.
    pub fn best_match(&self) -> Option<&Combo> {
        self.parsed.combos.first()
    }

    pub fn parsed_items_message(&self) -> Option<&'static str> {
        if self.parsed.parsed_items.is_empty() {
            Some("No items could be parsed from your input.")
        } else {
            None
        }
    }

    pub fn combos_message(&self) -> Option<&'static str> {
        if !self.parsed.combos.is_empty() {
            None
        } else if !self.parsed.suggestions.is_empty() {
            Some("Could not find matching products for all items. Check individual suggestions below.")
        } else {
            Some("No combo suggestions available. Try different items or colors!")
        }
    }

    pub fn suggestions_message(&self) -> Option<&'static str> {
        if self.parsed.suggestions.is_empty() {
            Some("No individual product suggestions available.")
        } else {
            None
        }
    }
}

/// Per-product result of adding a whole combo. There is no batch endpoint,
/// so lines that failed are reported rather than rolled back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboAddReport {
    pub requested: usize,
    pub added: Vec<i64>,
    pub failed: Vec<(i64, String)>,
    pub badge: Option<Badge>,
}

impl ComboAddReport {
    pub fn is_complete(&self) -> bool {
        self.requested > 0 && self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<i64> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

/// Client-side list of wanted items fed to the recommend endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasketDraft {
    items: Vec<BasketRequestItem>,
}

impl BasketDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        description: &str,
        category_id: Option<i64>,
        color: Option<&str>,
    ) -> Result<()> {
        let description = description.trim();
        if description.is_empty() {
            return Err(StorefrontError::validation(
                "description",
                "Describe the item you are looking for",
            ));
        }

        self.items.push(BasketRequestItem {
            description: description.to_string(),
            category_id,
            color: color
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        });
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<BasketRequestItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[BasketRequestItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct VirtualBasketController<A: StorefrontApi + 'static, N: Notifier> {
    api: Arc<A>,
    notifier: Arc<N>,
}

impl<A: StorefrontApi + 'static, N: Notifier> VirtualBasketController<A, N> {
    pub fn new(api: Arc<A>, notifier: Arc<N>) -> Self {
        Self { api, notifier }
    }

    pub async fn parse(&self, text: &str) -> BasketOutcome {
        let text = text.trim();
        if text.is_empty() {
            self.notifier
                .notify(Notification::warning("Please enter what you're looking for"));
            return BasketOutcome::EmptyInput;
        }

        match self.api.basket_parse(text).await {
            Ok(parsed) => {
                if let Some(error) = parsed.error.clone() {
                    self.notifier.notify(Notification::error(error.clone()));
                    return BasketOutcome::Failed(error);
                }
                tracing::debug!(
                    "Basket parsed into {} items, {} combos, {} suggestions",
                    parsed.parsed_items.len(),
                    parsed.combos.len(),
                    parsed.suggestions.len()
                );
                BasketOutcome::Results(BasketResults { parsed })
            }
            Err(e) => {
                tracing::error!("Basket parse failed: {}", e);
                let message = match e.server_message() {
                    Some(message) if !message.is_empty() => message.to_string(),
                    _ => "Failed to process your request".to_string(),
                };
                self.notifier.notify(Notification::error(message.clone()));
                BasketOutcome::Failed(message)
            }
        }
    }

    /// Adds one unit of every product, one request each, concurrently.
    pub async fn add_combo_to_cart(&self, product_ids: &[i64]) -> ComboAddReport {
        if product_ids.is_empty() {
            return ComboAddReport::default();
        }

        let mut tasks = JoinSet::new();
        for (index, &product_id) in product_ids.iter().enumerate() {
            let api = Arc::clone(&self.api);
            tasks.spawn(async move { (index, api.cart_add(product_id, 1).await) });
        }

        let mut outcomes: Vec<Option<std::result::Result<(), String>>> =
            vec![None; product_ids.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(_))) => outcomes[index] = Some(Ok(())),
                Ok((index, Err(e))) => outcomes[index] = Some(Err(e.user_friendly_message())),
                Err(e) => tracing::error!("Combo add task failed: {}", e),
            }
        }

        let mut report = ComboAddReport {
            requested: product_ids.len(),
            ..ComboAddReport::default()
        };
        for (&product_id, outcome) in product_ids.iter().zip(outcomes) {
            match outcome {
                Some(Ok(())) => report.added.push(product_id),
                Some(Err(reason)) => report.failed.push((product_id, reason)),
                None => report
                    .failed
                    .push((product_id, "Request was aborted".to_string())),
            }
        }

        let notification = if report.failed.is_empty() {
            Notification::success(format!("Added {} items to cart!", report.added.len()))
        } else if !report.added.is_empty() {
            Notification::warning(format!(
                "Added {} of {} items to cart",
                report.added.len(),
                report.requested
            ))
        } else {
            Notification::error("Failed to add combo to cart")
        };
        self.notifier.notify(notification);

        if !report.added.is_empty() {
            report.badge = match self.api.cart_count().await {
                Ok(count) => Some(Badge::new(count)),
                Err(e) => {
                    tracing::error!("Error updating cart badge: {}", e);
                    None
                }
            };
        }
        report
    }

    /// Sends the draft to the recommend endpoint. Combination order is kept
    /// exactly as the server ranked it.
    pub async fn recommend(&self, draft: &BasketDraft) -> Result<Recommendation> {
        if draft.is_empty() {
            self.notifier
                .notify(Notification::warning("Add at least one item to your basket"));
            return Err(StorefrontError::validation(
                "items",
                "Add at least one item to your basket",
            ));
        }

        match self.api.basket_recommend(draft.items()).await {
            Ok(recommendation) => Ok(recommendation),
            Err(e) => {
                tracing::error!("Basket recommendation failed: {}", e);
                self.notifier
                    .notify(Notification::error("Failed to get recommendations"));
                Err(e)
            }
        }
    }
}
