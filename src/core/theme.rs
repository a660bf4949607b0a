use crate::domain::model::Theme;
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use std::sync::Arc;

pub const THEME_KEY: &str = "theme";

pub struct ThemeController<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> ThemeController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stored theme; light when nothing valid is stored.
    pub async fn current(&self) -> Result<Theme> {
        let stored = self.store.get(THEME_KEY).await?;
        Ok(match stored {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
            None => Theme::default(),
        })
    }

    pub async fn set(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str()).await
    }

    pub async fn toggle(&self) -> Result<Theme> {
        let next = self.current().await?.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
