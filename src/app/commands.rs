use crate::app::Storefront;
use crate::config::cli::{BasketAction, CartAction, Command, ThemeAction, WishlistAction};
use crate::core::basket::{BasketDraft, BasketOutcome};
use crate::core::catalog::ProductListing;
use crate::core::wishlist::ToggleOutcome;
use crate::domain::model::Badge;
use crate::domain::ports::{Notifier, ProductQuery, StorefrontApi};
use crate::utils::error::{Result, StorefrontError};

/// What a command printed and whether it did what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// Splits a `description[:category_id[:color]]` basket item.
pub fn parse_basket_item(spec: &str) -> Result<(String, Option<i64>, Option<String>)> {
    let mut parts = spec.splitn(3, ':');
    let description = parts.next().unwrap_or_default().trim().to_string();

    let category_id = match parts.next().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            StorefrontError::validation("item", format!("Invalid category id '{}'", raw))
        })?),
    };

    let color = parts
        .next()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok((description, category_id, color))
}

pub async fn run<N: Notifier + 'static>(
    command: &Command,
    storefront: &Storefront<N>,
) -> Result<CommandOutput> {
    let output = dispatch(command, storefront).await?;

    match command {
        Command::Logout if output.success => storefront.forget_session().await?,
        _ => storefront.persist_session().await?,
    }
    Ok(output)
}

async fn dispatch<N: Notifier + 'static>(
    command: &Command,
    storefront: &Storefront<N>,
) -> Result<CommandOutput> {
    let renderer = storefront.renderer();

    match command {
        Command::Login { username, password } => {
            let outcome = storefront.auth.login(username, password).await;
            Ok(CommandOutput {
                success: outcome.succeeded(),
                text: outcome.message.text,
            })
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let outcome = storefront.auth.register(username, email, password).await;
            Ok(CommandOutput {
                success: outcome.succeeded(),
                text: outcome.message.text,
            })
        }
        Command::Logout => match storefront.auth.logout().await {
            Some(_) => Ok(CommandOutput::ok("Logged out")),
            None => Ok(CommandOutput::failed("Logout failed")),
        },
        Command::Session => {
            let link = storefront.auth.check_session().await;
            Ok(CommandOutput::ok(renderer.auth_link(&link)))
        }
        Command::Categories => {
            let categories = storefront.catalog.categories().await?;
            if categories.is_empty() {
                return Ok(CommandOutput::ok("No categories found."));
            }
            let text = categories
                .iter()
                .map(|c| renderer.category_card(c))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(CommandOutput::ok(text))
        }
        Command::Products {
            search,
            category,
            featured,
        } => {
            if *featured {
                let products = storefront.catalog.featured_products().await?;
                return Ok(CommandOutput::ok(renderer.products(&products)));
            }
            let query = ProductQuery::default()
                .with_search(search.trim())
                .with_category(*category);
            let listing = storefront.catalog.load_products(&query).await;
            Ok(CommandOutput {
                success: !matches!(listing, ProductListing::Failed),
                text: renderer.product_listing(&listing),
            })
        }
        Command::Cart { action } => cart(action, storefront).await,
        Command::Wishlist { action } => wishlist(action, storefront).await,
        Command::Basket { action } => basket(action, storefront).await,
        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => storefront.theme.current().await?,
                ThemeAction::Set { theme } => {
                    storefront.theme.set(*theme).await?;
                    *theme
                }
                ThemeAction::Toggle => storefront.theme.toggle().await?,
            };
            Ok(CommandOutput::ok(format!("Theme: {}", theme)))
        }
    }
}

async fn cart<N: Notifier + 'static>(
    action: &CartAction,
    storefront: &Storefront<N>,
) -> Result<CommandOutput> {
    let renderer = storefront.renderer();

    match action {
        CartAction::List => {
            let cart = storefront.cart.load_cart().await?;
            Ok(CommandOutput::ok(renderer.cart(&cart)))
        }
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let outcome = storefront.cart.add_to_cart(*product_id, *quantity).await;
            if outcome.added {
                Ok(CommandOutput::ok(renderer.badge("Cart", outcome.badge)))
            } else {
                Ok(CommandOutput::failed(String::new()))
            }
        }
        CartAction::Update {
            cart_item_id,
            quantity,
        } => {
            let badge = storefront
                .cart
                .update_quantity(*cart_item_id, *quantity)
                .await?;
            Ok(CommandOutput::ok(renderer.badge("Cart", badge)))
        }
        CartAction::Remove { cart_item_id } => {
            let badge = storefront.cart.remove_item(*cart_item_id).await?;
            Ok(CommandOutput::ok(renderer.badge("Cart", badge)))
        }
        CartAction::Count => {
            let badge = storefront.cart.badge().await;
            Ok(CommandOutput {
                success: badge.is_some(),
                text: renderer.badge("Cart", badge),
            })
        }
    }
}

async fn wishlist<N: Notifier + 'static>(
    action: &WishlistAction,
    storefront: &Storefront<N>,
) -> Result<CommandOutput> {
    let renderer = storefront.renderer();

    match action {
        WishlistAction::Ids => {
            let saved = storefront.api().wishlist_ids().await?;
            if saved.ids.is_empty() {
                return Ok(CommandOutput::ok("Your wishlist is empty."));
            }
            let ids = saved
                .ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Ok(CommandOutput::ok(ids))
        }
        WishlistAction::Count => {
            let count = storefront.api().wishlist_count().await?;
            Ok(CommandOutput::ok(
                renderer.badge("Wishlist", Some(Badge::new(count))),
            ))
        }
        WishlistAction::Toggle { product_id } => {
            storefront.wishlist.preload(&[*product_id]).await;
            let outcome = storefront.wishlist.toggle(*product_id).await;
            let heart = renderer.heart(*product_id, storefront.wishlist.heart(*product_id));
            let badge = renderer.badge("Wishlist", storefront.wishlist.badge());
            Ok(CommandOutput {
                success: matches!(
                    outcome,
                    ToggleOutcome::Added { .. } | ToggleOutcome::Removed { .. }
                ),
                text: format!("{}\n{}", heart, badge),
            })
        }
        WishlistAction::Remove { product_id } => {
            if storefront.wishlist.remove_from_page(*product_id).await {
                Ok(CommandOutput::ok(
                    renderer.badge("Wishlist", storefront.wishlist.badge()),
                ))
            } else {
                Ok(CommandOutput::failed(String::new()))
            }
        }
    }
}

async fn basket<N: Notifier + 'static>(
    action: &BasketAction,
    storefront: &Storefront<N>,
) -> Result<CommandOutput> {
    let renderer = storefront.renderer();

    match action {
        BasketAction::Parse { text } => match storefront.basket.parse(&text.join(" ")).await {
            BasketOutcome::Results(results) => {
                Ok(CommandOutput::ok(renderer.basket_results(&results)))
            }
            BasketOutcome::EmptyInput => Ok(CommandOutput::failed(String::new())),
            BasketOutcome::Failed(message) => Ok(CommandOutput::failed(message)),
        },
        BasketAction::Combo { product_ids } => {
            let report = storefront.basket.add_combo_to_cart(product_ids).await;
            let mut text = renderer.combo_report(&report);
            if report.badge.is_some() {
                text.push('\n');
                text.push_str(&renderer.badge("Cart", report.badge));
            }
            Ok(CommandOutput {
                success: report.is_complete(),
                text,
            })
        }
        BasketAction::Recommend { items } => {
            let mut draft = BasketDraft::new();
            for spec in items {
                let (description, category_id, color) = parse_basket_item(spec)?;
                draft.add(&description, category_id, color.as_deref())?;
            }
            let recommendation = storefront.basket.recommend(&draft).await?;
            Ok(CommandOutput::ok(renderer.recommendation(&recommendation)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basket_item_forms() {
        assert_eq!(
            parse_basket_item("linen shirt").unwrap(),
            ("linen shirt".to_string(), None, None)
        );
        assert_eq!(
            parse_basket_item("jeans:2").unwrap(),
            ("jeans".to_string(), Some(2), None)
        );
        assert_eq!(
            parse_basket_item("belt::black").unwrap(),
            ("belt".to_string(), None, Some("black".to_string()))
        );
        assert_eq!(
            parse_basket_item(" shoes : 4 : white ").unwrap(),
            ("shoes".to_string(), Some(4), Some("white".to_string()))
        );
    }

    #[test]
    fn test_parse_basket_item_rejects_bad_category() {
        let err = parse_basket_item("shirt:tops").unwrap_err();
        assert!(matches!(err, StorefrontError::ValidationError { .. }));
        assert!(err.user_friendly_message().contains("tops"));
    }
}
