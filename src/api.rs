use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::ApiError;

/// Thin JSON transport over the clinic REST API.
///
/// Cloning is cheap: the underlying `reqwest::Client` and the token slot are
/// shared, so a token installed by the session is seen by every clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Collection and item paths always end with a slash, the way the backend routes them.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{}/", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.builder(Method::GET, path).await;
        let resp = send(builder, Method::GET, path).await?;
        decode(resp).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.builder(Method::POST, path).await.json(body);
        let resp = send(builder, Method::POST, path).await?;
        decode(resp).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.builder(Method::PUT, path).await.json(body);
        let resp = send(builder, Method::PUT, path).await?;
        decode(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let builder = self.builder(Method::DELETE, path).await;
        send(builder, Method::DELETE, path).await?;
        Ok(())
    }

    async fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }
        builder
    }
}

async fn send(builder: RequestBuilder, method: Method, path: &str) -> Result<Response, ApiError> {
    tracing::debug!(%method, path, "api request");

    let resp = builder.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Request failed".to_string());
        tracing::debug!(%method, path, %status, "api request rejected");
        return Err(ApiError::Status { status, body });
    }

    Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
