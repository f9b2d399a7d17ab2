//! Post sources backed by the listing service or a local JSON document.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use lizard_api_types::PostsEnvelope;
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::application::provider::{PostSource, SourceError, StaticPostSource};
use crate::config::UpstreamSettings;
use crate::domain::entities::PostRecord;
use crate::infra::error::InfraError;

/// Decode a `{ "posts": [...] }` document. A single post with an invalid
/// publish date makes the whole listing malformed.
pub fn decode_posts(bytes: &[u8]) -> Result<Vec<PostRecord>, SourceError> {
    let envelope =
        PostsEnvelope::from_slice(bytes).map_err(|err| SourceError::malformed(err.to_string()))?;

    envelope
        .posts
        .into_iter()
        .map(PostRecord::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| {
            warn!(
                target = "lizard::upstream",
                error = %err,
                "rejecting listing with invalid post"
            );
            SourceError::malformed(err.to_string())
        })
}

/// `GET {base}/api/posts` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPostSource {
    client: Client,
    url: Url,
}

impl HttpPostSource {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, InfraError> {
        let url = settings
            .posts_url()
            .map_err(|err| InfraError::upstream(format!("invalid listing url: {err}")))?;
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::upstream(err.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn user_agent() -> &'static str {
    concat!("lizard/", env!("CARGO_PKG_VERSION"))
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| SourceError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SourceError::transport(err.to_string()))?;
        decode_posts(&body)
    }
}

/// Read and decode a listing document from disk.
pub async fn load_fixture(path: &Path) -> Result<Vec<PostRecord>, SourceError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| SourceError::fixture(format!("{}: {err}", path.display())))?;
    decode_posts(&bytes)
}

/// Build the configured source. A fixture is loaded once here and served
/// from memory, so a missing or malformed file fails startup.
pub async fn build_source(settings: &UpstreamSettings) -> Result<Arc<dyn PostSource>, InfraError> {
    match settings.fixture.as_deref() {
        Some(path) => {
            let posts = load_fixture(path).await.map_err(|err| {
                InfraError::fixture(path.display().to_string(), err.to_string())
            })?;
            info!(
                target = "lizard::upstream",
                path = %path.display(),
                posts = posts.len(),
                "serving posts from fixture"
            );
            Ok(Arc::new(StaticPostSource::new(posts)))
        }
        None => {
            let source = HttpPostSource::new(settings)?;
            info!(
                target = "lizard::upstream",
                url = %source.url(),
                timeout_ms = settings.timeout.as_millis() as u64,
                "serving posts from listing service"
            );
            Ok(Arc::new(source))
        }
    }
}
