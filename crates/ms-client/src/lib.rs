//! Backend data loader.
//!
//! `Backend` is the seam the storefront talks through; `HttpBackend` is the
//! reqwest implementation used in the browser. Every call is a single
//! attempt: no retry, no timeout, no backoff.

use async_trait::async_trait;
use ms_api_types::{
    Cart, CartMutation, Category, FavoriteToggle, MutationAck, Product, ProductId, ProductQuery,
};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const AUTH_HEADER: &str = "X-Telegram-Init-Data";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("API Error: {status}")]
    Status { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The REST surface consumed by the storefront.
#[async_trait(?Send)]
pub trait Backend {
    async fn categories(&self) -> ApiResult<Vec<Category>>;
    async fn products(&self, query: ProductQuery) -> ApiResult<Vec<Product>>;
    async fn product(&self, id: ProductId) -> ApiResult<Product>;
    async fn cart(&self) -> ApiResult<Cart>;
    async fn add_to_cart(&self, item: CartMutation) -> ApiResult<MutationAck>;
    async fn update_cart(&self, item: CartMutation) -> ApiResult<MutationAck>;
    async fn remove_from_cart(&self, id: ProductId) -> ApiResult<MutationAck>;
    async fn favorites(&self) -> ApiResult<Vec<Product>>;
    async fn toggle_favorite(&self, id: ProductId) -> ApiResult<FavoriteToggle>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Categories,
    Products,
    Product(ProductId),
    Cart,
    CartAdd,
    CartUpdate,
    CartRemove(ProductId),
    Favorites,
    ToggleFavorite(ProductId),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CartAdd | Endpoint::CartUpdate | Endpoint::ToggleFavorite(_) => Method::POST,
            Endpoint::CartRemove(_) => Method::DELETE,
            _ => Method::GET,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Categories => "/categories".to_owned(),
            Endpoint::Products => "/products".to_owned(),
            Endpoint::Product(id) => format!("/products/{id}"),
            Endpoint::Cart => "/cart".to_owned(),
            Endpoint::CartAdd => "/cart/add".to_owned(),
            Endpoint::CartUpdate => "/cart/update".to_owned(),
            Endpoint::CartRemove(id) => format!("/cart/{id}"),
            Endpoint::Favorites => "/favorites".to_owned(),
            Endpoint::ToggleFavorite(id) => format!("/favorites/{id}"),
        }
    }
}

/// HTTP implementation of [`Backend`].
///
/// `base_url` must be absolute (e.g. `https://shop.example/api`); the browser
/// layer resolves a relative base against the page origin.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    auth_header: String,
    init_data: String,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, init_data: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: AUTH_HEADER.to_owned(),
            init_data: init_data.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_auth_header(mut self, name: impl Into<String>) -> Self {
        self.auth_header = name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and decode the JSON body of a successful response.
    pub async fn request<T, B>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let method = endpoint.method();
        let url = format!("{}{}", self.base_url, endpoint.path());
        debug!(%method, %url, "backend request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(self.auth_header.as_str(), self.init_data.as_str());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "backend rejected request");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.request::<T, ()>(endpoint, query, None).await
    }
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.fetch(Endpoint::Categories, &[]).await
    }

    async fn products(&self, query: ProductQuery) -> ApiResult<Vec<Product>> {
        self.fetch(Endpoint::Products, &query.pairs()).await
    }

    async fn product(&self, id: ProductId) -> ApiResult<Product> {
        self.fetch(Endpoint::Product(id), &[]).await
    }

    async fn cart(&self) -> ApiResult<Cart> {
        self.fetch(Endpoint::Cart, &[]).await
    }

    async fn add_to_cart(&self, item: CartMutation) -> ApiResult<MutationAck> {
        self.request(Endpoint::CartAdd, &[], Some(&item)).await
    }

    async fn update_cart(&self, item: CartMutation) -> ApiResult<MutationAck> {
        self.request(Endpoint::CartUpdate, &[], Some(&item)).await
    }

    async fn remove_from_cart(&self, id: ProductId) -> ApiResult<MutationAck> {
        self.fetch(Endpoint::CartRemove(id), &[]).await
    }

    async fn favorites(&self) -> ApiResult<Vec<Product>> {
        self.fetch(Endpoint::Favorites, &[]).await
    }

    async fn toggle_favorite(&self, id: ProductId) -> ApiResult<FavoriteToggle> {
        self.fetch(Endpoint::ToggleFavorite(id), &[]).await
    }
}
