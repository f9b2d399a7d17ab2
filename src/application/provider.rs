//! Shared post-data provider.
//!
//! Both surfaces resolve posts through one [`PostProvider`]. The fetched
//! catalog is cached per browser session and concurrent requests for the same
//! session share a single upstream fetch. A failed fetch leaves the slot empty
//! so the next request retries.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use lru::LruCache;
use metrics::{counter, histogram};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::application::session::SessionId;
use crate::application::store::PostCatalog;
use crate::domain::entities::PostRecord;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::provider";

/// The post-listing collaborator.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError>;
}

#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("post listing request failed: {0}")]
    Transport(String),
    #[error("post listing answered with status {status}")]
    Status { status: u16 },
    #[error("malformed post listing: {0}")]
    Malformed(String),
    #[error("post fixture unavailable: {0}")]
    Fixture(String),
}

impl SourceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture(message.into())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// In-memory source serving a fixed list of posts.
#[derive(Debug, Clone, Default)]
pub struct StaticPostSource {
    posts: Vec<PostRecord>,
}

impl StaticPostSource {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl PostSource for StaticPostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Ok(self.posts.clone())
    }
}

type CatalogSlot = Arc<OnceCell<Arc<PostCatalog>>>;

pub struct PostProvider {
    source: Arc<dyn PostSource>,
    slots: Mutex<LruCache<SessionId, CatalogSlot>>,
}

impl PostProvider {
    pub fn new(source: Arc<dyn PostSource>, capacity: NonZeroUsize) -> Self {
        Self {
            source,
            slots: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Catalog of `session`, fetching it when the session has none yet.
    pub async fn catalog(&self, session: SessionId) -> Result<Arc<PostCatalog>, ProviderError> {
        let slot = self.slot(session);
        if let Some(catalog) = slot.get() {
            counter!("lizard_posts_cache_hit_total").increment(1);
            return Ok(Arc::clone(catalog));
        }

        let result = slot
            .get_or_try_init(|| async {
                counter!("lizard_posts_cache_miss_total").increment(1);
                let started = Instant::now();
                let posts = self.source.fetch_posts().await;
                histogram!("lizard_posts_fetch_ms")
                    .record(started.elapsed().as_secs_f64() * 1_000.0);
                let posts = posts?;
                debug!(
                    target = "lizard::provider",
                    session = %session,
                    posts = posts.len(),
                    "fetched post listing"
                );
                Ok::<_, SourceError>(Arc::new(PostCatalog::new(posts)))
            })
            .await;

        match result {
            Ok(catalog) => Ok(Arc::clone(catalog)),
            Err(err) => {
                counter!("lizard_posts_fetch_failed_total").increment(1);
                warn!(
                    target = "lizard::provider",
                    session = %session,
                    error = %err,
                    "post listing fetch failed"
                );
                Err(err.into())
            }
        }
    }

    /// Forget the cached catalog of `session`.
    pub fn invalidate(&self, session: SessionId) {
        mutex_lock(&self.slots, SOURCE, "invalidate").pop(&session);
    }

    fn slot(&self, session: SessionId) -> CatalogSlot {
        let mut slots = mutex_lock(&self.slots, SOURCE, "slot");
        if let Some(slot) = slots.get(&session) {
            return Arc::clone(slot);
        }
        let slot: CatalogSlot = Arc::new(OnceCell::new());
        slots.put(session, Arc::clone(&slot));
        slot
    }
}
