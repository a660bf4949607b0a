use crate::core::auth::AuthLink;
use crate::core::basket::{BasketResults, ComboAddReport, BEST_MATCH_LABEL};
use crate::core::catalog::{category_link, ProductListing};
use crate::core::wishlist::HeartState;
use crate::domain::model::{Badge, Cart, Category, Combo, Product, Recommendation};
use rust_decimal::Decimal;
use std::fmt::Write;

/// Plain-text views of storefront data.
#[derive(Debug, Clone)]
pub struct Renderer {
    currency: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("₹")
    }
}

impl Renderer {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn price(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency, amount.round_dp(2))
    }

    pub fn product_card(&self, product: &Product) -> String {
        let mut details = Vec::new();
        if let Some(color) = product.color.as_deref().filter(|c| !c.is_empty()) {
            details.push(format!("Color: {}", color));
        }
        if let Some(size) = product.size.as_deref().filter(|s| !s.is_empty()) {
            details.push(format!("Size: {}", size));
        }
        details.push(if product.in_stock() {
            "In Stock".to_string()
        } else {
            "Out of Stock".to_string()
        });

        format!(
            "#{} {}  {}\n    {}",
            product.product_id,
            product.product_name,
            self.price(product.price),
            details.join(" | ")
        )
    }

    pub fn product_listing(&self, listing: &ProductListing) -> String {
        match listing.message() {
            Some(message) => message.to_string(),
            None => self.products(listing.products()),
        }
    }

    pub fn products(&self, products: &[Product]) -> String {
        products
            .iter()
            .map(|p| self.product_card(p))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn category_card(&self, category: &Category) -> String {
        let mut out = format!(
            "[{}] {}  ({})",
            category.category_id,
            category.category_name,
            category_link(category.category_id)
        );
        if let Some(description) = category.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(out, "\n    {}", description);
        }
        out
    }

    pub fn cart(&self, cart: &Cart) -> String {
        if cart.is_empty() {
            return "Your cart is empty.".to_string();
        }

        let mut out = String::new();
        for item in &cart.items {
            let _ = writeln!(
                out,
                "[{}] {} x{}  {} each  = {}",
                item.cart_item_id,
                item.product_name,
                item.quantity,
                self.price(item.price),
                self.price(item.line_total())
            );
        }
        let _ = write!(
            out,
            "{} items, subtotal {}",
            cart.item_count(),
            self.price(cart.subtotal())
        );
        out
    }

    pub fn badge(&self, label: &str, badge: Option<Badge>) -> String {
        match badge {
            Some(badge) if badge.visible() => format!("{}: {}", label, badge.count),
            Some(_) => format!("{}: empty", label),
            None => format!("{}: unavailable", label),
        }
    }

    pub fn heart(&self, product_id: i64, heart: HeartState) -> String {
        format!("{} product #{}", heart.glyph(), product_id)
    }

    pub fn auth_link(&self, link: &AuthLink) -> String {
        format!("{} -> {}", link.label(), link.href())
    }

    pub fn combo(&self, combo: &Combo, best: bool) -> String {
        let mut out = combo.name.clone();
        if best {
            let _ = write!(out, "  [{}]", BEST_MATCH_LABEL);
        }
        if !combo.description.is_empty() {
            let _ = write!(out, "\n  {}", combo.description);
        }
        for item in &combo.items {
            let _ = write!(out, "\n  - #{} {}", item.id, item.name);
            if let Some(color) = item.color.as_deref().filter(|c| !c.is_empty()) {
                let _ = write!(out, " (Color: {})", color);
            }
            let _ = write!(out, "  {}", self.price(item.price));
        }
        let _ = write!(out, "\n  Total Price: {}", self.price(combo.total_price));
        out
    }

    pub fn basket_results(&self, results: &BasketResults) -> String {
        let mut sections = Vec::new();

        let parsed = match results.parsed_items_message() {
            Some(message) => message.to_string(),
            None => results
                .parsed
                .parsed_items
                .iter()
                .map(|item| format!("  {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        sections.push(format!("Parsed items:\n{}", parsed));

        let combos = match results.combos_message() {
            Some(message) => message.to_string(),
            None => results
                .parsed
                .combos
                .iter()
                .enumerate()
                .map(|(index, combo)| self.combo(combo, index == 0))
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        sections.push(format!("Suggested combos:\n{}", combos));

        let suggestions = match results.suggestions_message() {
            Some(message) => message.to_string(),
            None => results
                .parsed
                .suggestions
                .iter()
                .map(|s| {
                    let products = if s.products.is_empty() {
                        "No matching products found for this item.".to_string()
                    } else {
                        self.products(&s.products)
                    };
                    format!("Matching products for: {}\n{}", s.item, products)
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
        };
        sections.push(format!("Product suggestions:\n{}", suggestions));

        sections.join("\n\n")
    }

    pub fn combo_report(&self, report: &ComboAddReport) -> String {
        let mut out = format!("Added {}/{}", report.added.len(), report.requested);
        for (product_id, reason) in &report.failed {
            let _ = write!(out, "\n  #{} failed: {}", product_id, reason);
        }
        out
    }

    pub fn recommendation(&self, recommendation: &Recommendation) -> String {
        let mut out = String::from("Recommended products:\n");
        if recommendation.recommendations.is_empty() {
            out.push_str("No matching products found.");
        } else {
            out.push_str(&self.products(&recommendation.recommendations));
        }

        out.push_str("\n\nCombinations:");
        if recommendation.combinations.is_empty() {
            out.push_str("\nNo combinations available.");
        }
        for combination in &recommendation.combinations {
            let [first, second, third] = combination.names();
            let _ = write!(
                out,
                "\n  {} + {} + {}  {}  (compatibility {})",
                first,
                second,
                third,
                self.price(combination.total_price()),
                combination.compatibility_score
            );
        }
        out
    }
}
