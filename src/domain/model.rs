use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Catalog product. Virtual-basket suggestions ship the same record with
/// `id`/`name` keys, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "id")]
    pub product_id: i64,
    #[serde(alias = "name")]
    pub product_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Products without a stock figure are treated as available.
    pub fn in_stock(&self) -> bool {
        self.stock.map(|s| s > 0).unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_item_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn find(&self, cart_item_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.cart_item_id == cart_item_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// The `{success, message?, error?}` envelope most write endpoints answer with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiAck {
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }

    /// Server text explaining the outcome; `error` wins over `message`.
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistIds {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub quantity: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl fmt::Display for ParsedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.color {
            Some(color) if !color.is_empty() => {
                write!(f, "{}x {} {}", self.quantity, color, self.item_type)
            }
            _ => write!(f, "{}x {}", self.quantity, self.item_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ComboProduct>,
    pub total_price: Decimal,
}

impl Combo {
    pub fn product_ids(&self) -> Vec<i64> {
        self.items.iter().map(|p| p.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub item: ParsedItem,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketParse {
    #[serde(default)]
    pub parsed_items: Vec<ParsedItem>,
    #[serde(default)]
    pub combos: Vec<Combo>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketRequestItem {
    pub description: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCombination {
    #[serde(default)]
    pub combination_id: Option<i64>,
    pub product_id_1: i64,
    pub product_id_2: i64,
    pub product_id_3: i64,
    pub name1: String,
    pub name2: String,
    pub name3: String,
    pub price1: Decimal,
    pub price2: Decimal,
    pub price3: Decimal,
    #[serde(default)]
    pub img1: Option<String>,
    #[serde(default)]
    pub img2: Option<String>,
    #[serde(default)]
    pub img3: Option<String>,
    pub compatibility_score: Decimal,
}

impl ProductCombination {
    pub fn product_ids(&self) -> [i64; 3] {
        [self.product_id_1, self.product_id_2, self.product_id_3]
    }

    pub fn names(&self) -> [&str; 3] {
        [&self.name1, &self.name2, &self.name3]
    }

    pub fn total_price(&self) -> Decimal {
        self.price1 + self.price2 + self.price3
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub recommendations: Vec<Product>,
    #[serde(default)]
    pub combinations: Vec<ProductCombination>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Info => "info",
        };
        f.write_str(s)
    }
}

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// A transient toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
            ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// A display time too large to represent never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| self.created_at.checked_add_signed(ttl))
            .is_some_and(|expires_at| now >= expires_at)
    }
}

/// Where the page goes after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Redirect(String),
    ShowLoginForm,
}

/// Visible state of a counter badge; hidden at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub count: u32,
}

impl Badge {
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    pub fn visible(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_from_string_or_number() {
        let from_number: Product = serde_json::from_value(serde_json::json!({
            "product_id": 1, "product_name": "Shirt", "price": 29.99
        }))
        .unwrap();
        let from_string: Product = serde_json::from_value(serde_json::json!({
            "product_id": 1, "product_name": "Shirt", "price": "29.99"
        }))
        .unwrap();

        assert_eq!(from_number.price, Decimal::from_str("29.99").unwrap());
        assert_eq!(from_number.price, from_string.price);
        assert!(from_number.in_stock());
    }

    #[test]
    fn test_product_accepts_basket_keys() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 7, "name": "Blue Jeans", "price": "49.50", "color": "blue", "stock": 0
        }))
        .unwrap();

        assert_eq!(product.product_id, 7);
        assert_eq!(product.product_name, "Blue Jeans");
        assert!(!product.in_stock());
    }

    #[test]
    fn test_cart_totals() {
        let cart = Cart::new(vec![
            CartItem {
                cart_item_id: 1,
                product_id: 10,
                product_name: "Shirt".to_string(),
                price: Decimal::from_str("10.50").unwrap(),
                quantity: 2,
                color: None,
                size: None,
                image_url: None,
            },
            CartItem {
                cart_item_id: 2,
                product_id: 11,
                product_name: "Hat".to_string(),
                price: Decimal::from(5),
                quantity: 1,
                color: Some("red".to_string()),
                size: None,
                image_url: None,
            },
        ]);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::from_str("26.00").unwrap());
        assert!(cart.find(2).is_some());
        assert!(cart.find(3).is_none());
    }

    #[test]
    fn test_parsed_item_display() {
        let item: ParsedItem =
            serde_json::from_value(serde_json::json!({"quantity": 2, "color": "red", "type": "shirt"}))
                .unwrap();
        assert_eq!(item.to_string(), "2x red shirt");

        let item: ParsedItem =
            serde_json::from_value(serde_json::json!({"quantity": 1, "type": "jacket"})).unwrap();
        assert_eq!(item.to_string(), "1x jacket");
    }

    #[test]
    fn test_basket_parse_defaults() {
        let parsed: BasketParse = serde_json::from_str("{}").unwrap();
        assert!(parsed.parsed_items.is_empty());
        assert!(parsed.combos.is_empty());
        assert!(parsed.suggestions.is_empty());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_ack_reason_prefers_error() {
        let ack = ApiAck {
            success: Some(false),
            message: Some("Invalid credentials".to_string()),
            error: Some("Not logged in".to_string()),
        };
        assert!(ack.is_rejected());
        assert_eq!(ack.reason(), Some("Not logged in"));
        assert!(!ApiAck::default().is_rejected());
    }

    #[test]
    fn test_theme_roundtrip_and_toggle() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::default(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    }

    #[test]
    fn test_notification_expiry() {
        let toast = Notification::success("Product added to cart!");
        assert!(!toast.is_expired_at(toast.created_at));
        assert!(toast.is_expired_at(toast.created_at + chrono::Duration::seconds(3)));

        let pinned =
            Notification::info("x").with_ttl(Duration::from_millis(1_000_000_000_000_000_000));
        assert!(!pinned.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_combination_totals() {
        let combo: ProductCombination = serde_json::from_value(serde_json::json!({
            "product_id_1": 1, "product_id_2": 2, "product_id_3": 3,
            "name1": "A", "name2": "B", "name3": "C",
            "price1": "10.00", "price2": 20, "price3": "5.5",
            "compatibility_score": "0.92"
        }))
        .unwrap();
        assert_eq!(combo.product_ids(), [1, 2, 3]);
        assert_eq!(combo.total_price(), Decimal::from_str("35.5").unwrap());
    }
}
