pub mod auth;
pub mod basket;
pub mod cart;
pub mod catalog;
pub mod theme;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Badge, Navigation, Notification};
pub use crate::domain::ports::{ConfigProvider, KeyValueStore, Notifier, ProductQuery, StorefrontApi};
pub use crate::utils::error::Result;
