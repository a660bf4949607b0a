use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::domain::model::Theme;
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront")]
#[command(about = "Terminal client for the storefront API")]
pub struct CliConfig {
    /// Storefront server, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the session cookie and preferences
    #[arg(long, global = true)]
    pub state_dir: Option<String>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login {
        username: String,
        /// Account password; read from STOREFRONT_PASSWORD when omitted
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show who is logged in
    Session,
    Categories,
    Products {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<i64>,
        /// Only the first few products, as on the home page
        #[arg(long)]
        featured: bool,
    },
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Virtual basket: free-text shopping requests
    Basket {
        #[command(subcommand)]
        action: BasketAction,
    },
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartAction {
    List,
    Add {
        product_id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity; 0 removes it
    Update { cart_item_id: i64, quantity: u32 },
    Remove { cart_item_id: i64 },
    Count,
}

#[derive(Debug, Clone, Subcommand)]
pub enum WishlistAction {
    Ids,
    Count,
    Toggle { product_id: i64 },
    Remove { product_id: i64 },
}

#[derive(Debug, Clone, Subcommand)]
pub enum BasketAction {
    /// e.g. `basket parse 2 red shirts and a black belt`
    Parse {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Add every product of a combo to the cart
    Combo {
        #[arg(required = true)]
        product_ids: Vec<i64>,
    },
    /// Ask for recommendations; items are `description[:category_id[:color]]`
    Recommend {
        #[arg(long = "item", required = true)]
        items: Vec<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ThemeAction {
    Show,
    Set { theme: Theme },
    Toggle,
}

impl CliConfig {
    /// 合併預設值、TOML 檔案與命令列參數
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_settings(),
            None => Settings::default(),
        };

        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(state_dir) = &self.state_dir {
            settings.state_dir = state_dir.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            settings.timeout_seconds = timeout;
        }
        Ok(settings)
    }
}
