pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod mapping;
pub mod params;
pub mod pipeline;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::api::{ContentSource, HttpContentSource};
    pub use crate::config::Config;
    pub use crate::error::FetchError;
    pub use crate::feed::{Completion, Feed, FeedStatus, LogNotifier, Notifier, Ticket};
    pub use crate::params::QueryParameters;
    pub use crate::pipeline::{ContentPage, PAGE_SIZE};
    pub use crate::storage::{FileSessionStore, MemorySessionStore, SessionStore};
    pub use crate::types::{ContentItem, PriceRange, PricingOption, SortKey};
    pub use crate::Closet;
}

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::api::{ContentSource, HttpContentSource};
use crate::config::Config;
use crate::error::FetchError;
use crate::feed::{Completion, Feed, Notifier, Ticket};
use crate::params::QueryParameters;
use crate::pipeline::ContentPage;
use crate::storage::{FileSessionStore, SessionStore};

/// Library entry point. Owns the catalog source and the session store; every
/// query fetches the full catalog fresh and runs the pipeline over it.
pub struct Closet {
    source: Arc<dyn ContentSource>,
    session: Arc<dyn SessionStore>,
}

impl Closet {
    /// HTTP source on the configured endpoint, token kept on disk.
    pub fn new(config: &Config) -> Result<Self> {
        let session: Arc<dyn SessionStore> = match &config.session_path {
            Some(p) => Arc::new(FileSessionStore::new(p)),
            None => Arc::new(FileSessionStore::default_location()?),
        };
        let source = HttpContentSource::new(config, session.clone())?;
        Ok(Self { source: Arc::new(source), session })
    }

    pub fn with_source(source: Arc<dyn ContentSource>, session: Arc<dyn SessionStore>) -> Self {
        Self { source, session }
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Fetch, filter, sort and slice out `params.page`.
    pub async fn query(&self, params: &QueryParameters) -> Result<ContentPage, FetchError> {
        let items = self.source.fetch_all().await?;
        let page = pipeline::query(&items, params);
        debug!(page = page.page, shown = page.items.len(), total = page.total_items, "query ran");
        Ok(page)
    }

    pub async fn fetch_page(&self, ticket: &Ticket) -> Result<ContentPage, FetchError> {
        self.query(ticket.params()).await
    }

    /// Run a feed ticket and hand the outcome back to the feed.
    pub async fn settle<N: Notifier>(&self, feed: &mut Feed<N>, ticket: &Ticket) -> Completion {
        let result = self.fetch_page(ticket).await;
        feed.complete(ticket, result)
    }
}
