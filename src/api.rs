use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::FetchError;
use crate::mapping::items_from_slice;
use crate::storage::SessionStore;
use crate::types::ContentItem;

/// Anything that can hand over the full catalog in one go.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<ContentItem>, FetchError>;
}

/// GET of the whole catalog from a single endpoint. No query parameters are
/// sent; filtering happens locally after the fetch.
pub struct HttpContentSource {
    client: reqwest::Client,
    endpoint: Url,
    session: Arc<dyn SessionStore>,
}

impl HttpContentSource {
    pub fn new(config: &Config, session: Arc<dyn SessionStore>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, endpoint: config.api_url.clone(), session })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_all(&self) -> Result<Vec<ContentItem>, FetchError> {
        let mut req =
            self.client.get(self.endpoint.clone()).header(header::ACCEPT, "application/json");
        if let Some(token) = self.session.token().await.map_err(FetchError::session)? {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(endpoint = %self.endpoint, "credentials rejected; clearing session");
            self.session.clear().await.map_err(FetchError::session)?;
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "catalog fetch failed");
            return Err(FetchError::Status(status));
        }

        let body = resp.bytes().await?;
        debug!(bytes = body.len(), "catalog payload received");
        let items = items_from_slice(&body)?;
        info!(count = items.len(), "catalog fetched");
        Ok(items)
    }
}
