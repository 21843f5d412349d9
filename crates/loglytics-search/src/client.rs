use async_trait::async_trait;
use serde_json::Value;

use loglytics_core::config::Config;

use crate::error::SearchError;

/// The narrow slice of the search engine API the backend consumes: one
/// `_search` per operation plus alias/mapping introspection for segments.
#[async_trait]
pub trait SearchClient: Send + Sync + 'static {
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError>;

    async fn get_alias(&self, alias: &str) -> Result<Value, SearchError>;

    async fn get_mapping(&self, index: &str) -> Result<Value, SearchError>;
}

/// HTTP client for an OpenSearch-compatible engine.
///
/// Request bodies are JSON aggregation trees; non-2xx responses become
/// [`SearchError::Engine`] with the raw body retained for server-side logs.
pub struct HttpSearchClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpSearchClient {
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.search_allow_unsecure)
            .build()?;
        Ok(Self {
            client,
            base_url: config.search_url.trim_end_matches('/').to_string(),
            username: config.search_username.clone(),
            password: config.search_password.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut req = self.client.request(method, url);
        if !self.username.is_empty() {
            req = req.basic_auth(&self.username, Some(&self.password));
        }
        req
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<Value, SearchError> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "search engine returned an error");
            return Err(SearchError::Engine {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError> {
        self.execute(
            self.request(reqwest::Method::POST, &format!("{index}/_search"))
                .json(body),
        )
        .await
    }

    async fn get_alias(&self, alias: &str) -> Result<Value, SearchError> {
        self.execute(self.request(reqwest::Method::GET, &format!("_alias/{alias}")))
            .await
    }

    async fn get_mapping(&self, index: &str) -> Result<Value, SearchError> {
        self.execute(self.request(reqwest::Method::GET, &format!("{index}/_mapping")))
            .await
    }
}
