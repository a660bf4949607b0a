use crate::domain::model::{Category, Product};
use crate::domain::ports::{ProductQuery, StorefrontApi};
use crate::utils::error::Result;
use std::sync::Arc;

pub const DEFAULT_FEATURED_LIMIT: usize = 8;

impl ProductQuery {
    /// Seeds the filter from a page query string such as `?category=3`.
    /// A non-numeric category is ignored.
    pub fn from_page_query(query: &str) -> Self {
        let mut filter = Self::default();
        let query = query.trim_start_matches('?');

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "category" | "category_id" => match value.parse() {
                    Ok(id) => filter.category_id = Some(id),
                    Err(_) => tracing::debug!("Ignoring category filter '{}'", value),
                },
                "search" => filter.search = value.into_owned(),
                _ => {}
            }
        }
        filter
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }
}

pub fn category_link(category_id: i64) -> String {
    format!("/products?category={}", category_id)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductListing {
    Loaded(Vec<Product>),
    Empty,
    Failed,
}

impl ProductListing {
    pub fn products(&self) -> &[Product] {
        match self {
            ProductListing::Loaded(products) => products.as_slice(),
            _ => &[],
        }
    }

    /// Placeholder text shown instead of the grid, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ProductListing::Loaded(_) => None,
            ProductListing::Empty => Some("No products found."),
            ProductListing::Failed => Some("Error loading products."),
        }
    }
}

pub struct CatalogController<A: StorefrontApi> {
    api: Arc<A>,
    featured_limit: usize,
}

impl<A: StorefrontApi> CatalogController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            featured_limit: DEFAULT_FEATURED_LIMIT,
        }
    }

    pub fn with_featured_limit(mut self, limit: usize) -> Self {
        self.featured_limit = limit;
        self
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let categories = self.api.categories().await?;
        tracing::debug!("Loaded {} categories", categories.len());
        Ok(categories)
    }

    pub async fn load_products(&self, query: &ProductQuery) -> ProductListing {
        match self.api.products(query).await {
            Ok(products) if products.is_empty() => ProductListing::Empty,
            Ok(products) => {
                tracing::debug!("Loaded {} products for {:?}", products.len(), query);
                ProductListing::Loaded(products)
            }
            Err(e) => {
                tracing::error!("Error loading products: {}", e);
                ProductListing::Failed
            }
        }
    }

    pub async fn featured_products(&self) -> Result<Vec<Product>> {
        let mut products = self.api.products(&ProductQuery::default()).await?;
        products.truncate(self.featured_limit);
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{product, FakeStorefront};

    #[test]
    fn test_from_page_query() {
        let filter = ProductQuery::from_page_query("?category=3&search=blue%20shirt");
        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.search, "blue shirt");

        let filter = ProductQuery::from_page_query("category=abc");
        assert_eq!(filter, ProductQuery::default());
    }

    #[test]
    fn test_category_link() {
        assert_eq!(category_link(4), "/products?category=4");
    }

    #[tokio::test]
    async fn test_featured_products_are_capped() {
        let catalog = CatalogController::new(Arc::new(FakeStorefront::new()));
        assert_eq!(catalog.featured_products().await.unwrap().len(), 8);

        let catalog =
            CatalogController::new(Arc::new(FakeStorefront::new())).with_featured_limit(3);
        let featured = catalog.featured_products().await.unwrap();
        assert_eq!(featured.len(), 3);
        assert_eq!(featured[0].product_id, 1);
    }

    #[tokio::test]
    async fn test_load_products_states() {
        let api = Arc::new(FakeStorefront::new());
        api.state().products.push({
            let mut p = product(42, "Red Scarf", 15);
            p.category_id = Some(2);
            p
        });
        let catalog = CatalogController::new(api.clone());

        let listing = catalog
            .load_products(&ProductQuery::default().with_search("Scarf").with_category(Some(2)))
            .await;
        assert_eq!(listing.products().len(), 1);
        assert_eq!(listing.message(), None);

        let listing = catalog
            .load_products(&ProductQuery::default().with_search("nothing-like-this"))
            .await;
        assert_eq!(listing, ProductListing::Empty);
        assert_eq!(listing.message(), Some("No products found."));

        api.state().offline = true;
        let listing = catalog.load_products(&ProductQuery::default()).await;
        assert_eq!(listing.message(), Some("Error loading products."));
    }
}
