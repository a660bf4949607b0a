use crate::domain::model::{
    ApiAck, BasketParse, BasketRequestItem, CartItem, Category, CountResponse, Product,
    Recommendation, SessionStatus, WishlistIds,
};
use crate::domain::ports::{ConfigProvider, ProductQuery, StorefrontApi};
use crate::utils::error::{Result, StorefrontError};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Typed client for the storefront REST API. Cheap to clone; clones share
/// the connection pool and the session cookie jar.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl HttpStorefront {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // join() replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Cookie header the client would send to the storefront, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Seeds the jar from a previously saved `Cookie` header value.
    pub fn restore_session_cookie(&self, cookie: &str) {
        for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("Making API request: {} {}", method, url);
        Ok(self.client.request(method, url))
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status for {}: {}", path, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = failure_message(&body);

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("{} requires a session: {:?}", path, message);
            Err(StorefrontError::Unauthorized { message })
        } else {
            tracing::warn!("{} failed with {}: {:?}", path, status, message);
            Err(StorefrontError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.request(Method::GET, path)?;
        let response = self.execute(request, path).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body);
        let response = self.execute(request, path).await?;
        Ok(response.json().await?)
    }

    async fn wishlist_mutation(&self, path: &str, product_id: i64) -> Result<u32> {
        let body: serde_json::Value = self
            .send_json(Method::POST, path, &json!({ "product_id": product_id }))
            .await?;

        body.get("count")
            .and_then(serde_json::Value::as_u64)
            .and_then(|count| u32::try_from(count).ok())
            .ok_or_else(|| StorefrontError::UnexpectedResponse {
                message: format!("{} answered without a valid count", path),
            })
    }
}

/// Pulls `error`/`message` out of a failure body, when it is JSON.
fn failure_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiAck>(body)
        .ok()
        .and_then(|ack| ack.reason().map(str::to_string))
}

fn expect_ack(ack: ApiAck) -> Result<ApiAck> {
    if ack.is_rejected() {
        return Err(StorefrontError::Rejected {
            message: ack.reason().unwrap_or("Request failed").to_string(),
        });
    }
    Ok(ack)
}

#[async_trait]
impl StorefrontApi for HttpStorefront {
    async fn login(&self, username: &str, password: &str) -> Result<ApiAck> {
        let ack = self
            .send_json(
                Method::POST,
                "api/login",
                &json!({ "username": username, "password": password }),
            )
            .await?;
        expect_ack(ack)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<ApiAck> {
        let ack = self
            .send_json(
                Method::POST,
                "api/register",
                &json!({ "username": username, "email": email, "password": password }),
            )
            .await?;
        expect_ack(ack)
    }

    async fn check_session(&self) -> Result<SessionStatus> {
        self.get_json("api/check-session").await
    }

    async fn logout(&self) -> Result<()> {
        let request = self.request(Method::POST, "api/logout")?;
        self.execute(request, "api/logout").await?;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.get_json("api/categories").await
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let mut params: Vec<(&str, String)> = vec![("search", query.search.clone())];
        if let Some(category_id) = query.category_id {
            params.push(("category_id", category_id.to_string()));
        }

        let request = self.request(Method::GET, "api/products")?.query(&params);
        let response = self.execute(request, "api/products").await?;
        Ok(response.json().await?)
    }

    async fn cart_add(&self, product_id: i64, quantity: u32) -> Result<ApiAck> {
        let ack = self
            .send_json(
                Method::POST,
                "api/cart/add",
                &json!({ "product_id": product_id, "quantity": quantity }),
            )
            .await?;
        expect_ack(ack)
    }

    async fn cart(&self) -> Result<Vec<CartItem>> {
        self.get_json("api/cart").await
    }

    async fn cart_update(&self, cart_item_id: i64, quantity: u32) -> Result<()> {
        let request = self
            .request(Method::PUT, "api/cart/update")?
            .json(&json!({ "cart_item_id": cart_item_id, "quantity": quantity }));
        self.execute(request, "api/cart/update").await?;
        Ok(())
    }

    async fn cart_remove(&self, cart_item_id: i64) -> Result<()> {
        let path = format!("api/cart/remove/{}", cart_item_id);
        let request = self.request(Method::DELETE, &path)?;
        self.execute(request, &path).await?;
        Ok(())
    }

    async fn cart_count(&self) -> Result<u32> {
        let response: CountResponse = self.get_json("api/cart/count").await?;
        Ok(response.count)
    }

    async fn basket_parse(&self, text: &str) -> Result<BasketParse> {
        self.send_json(
            Method::POST,
            "api/virtual-basket/parse",
            &json!({ "text": text }),
        )
        .await
    }

    async fn basket_recommend(&self, items: &[BasketRequestItem]) -> Result<Recommendation> {
        let recommendation: Recommendation = self
            .send_json(
                Method::POST,
                "api/virtual-basket/recommend",
                &json!({ "items": items }),
            )
            .await?;

        if let Some(error) = &recommendation.error {
            return Err(StorefrontError::Rejected {
                message: error.clone(),
            });
        }
        Ok(recommendation)
    }

    async fn wishlist_ids(&self) -> Result<WishlistIds> {
        self.get_json("wishlist/ids").await
    }

    async fn wishlist_count(&self) -> Result<u32> {
        let response: CountResponse = self.get_json("wishlist/count").await?;
        Ok(response.count)
    }

    async fn wishlist_add(&self, product_id: i64) -> Result<u32> {
        self.wishlist_mutation("wishlist/add", product_id).await
    }

    async fn wishlist_remove(&self, product_id: i64) -> Result<u32> {
        self.wishlist_mutation("wishlist/remove", product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = HttpStorefront::new("http://127.0.0.1:5000/shop", Duration::from_secs(5))
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:5000/shop/");
        assert_eq!(
            client.endpoint("api/cart/count").unwrap().as_str(),
            "http://127.0.0.1:5000/shop/api/cart/count"
        );
    }

    #[test]
    fn test_rejects_non_url() {
        assert!(HttpStorefront::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_failure_message_extraction() {
        assert_eq!(
            failure_message(r#"{"error": "Not logged in"}"#).as_deref(),
            Some("Not logged in")
        );
        assert_eq!(
            failure_message(r#"{"message": "Invalid credentials", "success": false}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(failure_message("<html>oops</html>"), None);
    }

    #[test]
    fn test_session_cookie_restore() {
        let client = HttpStorefront::new("http://127.0.0.1:5000", Duration::from_secs(5)).unwrap();
        assert!(client.session_cookie().is_none());

        client.restore_session_cookie("session=abc123");
        assert_eq!(client.session_cookie().as_deref(), Some("session=abc123"));
    }

    #[test]
    fn test_expect_ack() {
        let ok = ApiAck {
            success: Some(true),
            ..ApiAck::default()
        };
        assert!(expect_ack(ok).is_ok());

        let rejected = ApiAck {
            success: Some(false),
            error: Some("Out of stock".to_string()),
            ..ApiAck::default()
        };
        match expect_ack(rejected) {
            Err(StorefrontError::Rejected { message }) => assert_eq!(message, "Out of stock"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
