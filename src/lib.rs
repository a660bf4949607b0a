pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{
    http::HttpStorefront,
    notifier::{ConsoleNotifier, RecordingNotifier, TtlNotifier},
    storage::LocalStorage,
};
pub use app::{render::Renderer, Storefront};
pub use config::Settings;
pub use utils::error::{Result, StorefrontError};
