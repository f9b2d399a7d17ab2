//! Fetched post collection and its load lifecycle.

use crate::domain::{entities::PostRecord, posts};

/// The full post collection of a session plus the categories derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCatalog {
    posts: Vec<PostRecord>,
    categories: Vec<String>,
}

impl PostCatalog {
    pub fn new(posts: Vec<PostRecord>) -> Self {
        let categories = posts::distinct_category_names(&posts);
        Self { posts, categories }
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    /// Distinct category names in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn find(&self, id: &str) -> Option<&PostRecord> {
        posts::find_by_id(&self.posts, id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Load lifecycle of a view's data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }
}
