//! Resolution of the detail surface for one post identifier.

use crate::application::store::PostCatalog;
use crate::domain::entities::PostRecord;

/// Outcome of resolving a post for the detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Found(PostRecord),
    NotFound,
    Failed(String),
}

impl DetailState {
    /// Resolve `id` against a fetched catalog or the reason the fetch failed.
    pub fn resolve(catalog: Result<&PostCatalog, String>, id: &str) -> Self {
        match catalog {
            Ok(catalog) => match catalog.find(id) {
                Some(post) => DetailState::Found(post.clone()),
                None => DetailState::NotFound,
            },
            Err(reason) => DetailState::Failed(reason),
        }
    }

    pub fn post(&self) -> Option<&PostRecord> {
        match self {
            DetailState::Found(post) => Some(post),
            _ => None,
        }
    }
}
