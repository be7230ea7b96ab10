//! Shared request/response layer for the REST APIs.

use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::errors::RepositoryError;

/// Thin wrapper over a `reqwest` client bound to one API instance.
///
/// # Example
///
/// ```ignore
/// use cms_migrator_repository::{http::HttpApi, ApiConfig};
///
/// let api = HttpApi::new(&ApiConfig::new("http://localhost:8055").with_token("secret"))?;
/// let body: serde_json::Value = api.get("collections", &[]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    token: Option<String>,
    client: ReqwestClient,
}

impl HttpApi {
    /// Create a client for the instance described by `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(HttpApi)` - A client ready to issue requests
    /// * `Err(RepositoryError)` - If the base URL is invalid
    pub fn new(config: &ApiConfig) -> Result<Self, RepositoryError> {
        Url::parse(&config.base_url)
            .map_err(|e| RepositoryError::invalid_url(format!("{}: {}", config.base_url, e)))?;

        info!(base_url = %config.base_url, "Created API client");

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client: ReqwestClient::new(),
        })
    }

    /// Build the absolute URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> Result<Url, RepositoryError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| RepositoryError::invalid_url(format!("{}: {}", raw, e)))
    }

    /// Issue a GET request and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RepositoryError> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(Method::GET, path, request).await
    }

    /// Issue a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, RepositoryError> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(Method::POST, path, request).await
    }

    /// Issue a PATCH request with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, RepositoryError> {
        let request = self.request(Method::PATCH, path)?.json(body);
        self.send(Method::PATCH, path, request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RepositoryError> {
        let url = self.endpoint(path)?;
        let request = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, RepositoryError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let text = response.text().await?;

        debug!(method = %method, path = %path, status = status.as_u16(), "API response");

        if !status.is_success() {
            // Keep whatever the server said; non-JSON bodies are kept as text.
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(RepositoryError::Response {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body,
            });
        }

        // Some write endpoints answer 204 with no body.
        let body: &str = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str(body)
            .map_err(|e| RepositoryError::decode(format!("{} {}: {}", method, path, e)))
    }
}
