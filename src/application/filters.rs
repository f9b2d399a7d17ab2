//! Category selection and its mirror in the URL query string.
//!
//! The selection is the single source of truth: every mutation recomputes the
//! filtered subset and the query string from it. The query string carries one
//! `category` parameter per selected category, in selection order.

use url::form_urlencoded;

use crate::domain::entities::PostRecord;

/// Name of the repeated query parameter that persists the selection.
pub const CATEGORY_PARAM: &str = "category";

/// Ordered set of selected category names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    names: Vec<String>,
}

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every `category` parameter from a raw query string (with or
    /// without the leading `?`). Repeated values collapse to one entry.
    pub fn from_query(query: &str) -> Self {
        let mut selection = Self::new();
        for (key, value) in parse_query(query) {
            if key == CATEGORY_PARAM && !selection.contains(&value) {
                selection.names.push(value);
            }
        }
        selection
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|selected| selected == name)
    }

    /// Add `name` when absent, remove it when present. Returns whether the
    /// category is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(position) = self.names.iter().position(|selected| selected == name) {
            self.names.remove(position);
            false
        } else {
            self.names.push(name.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether `post` passes the filter: any of its categories is selected,
    /// or nothing is selected at all.
    pub fn matches(&self, post: &PostRecord) -> bool {
        self.is_empty() || post.category_names().any(|name| self.contains(name))
    }

    /// The subset of `posts` passing the filter, in source order.
    pub fn apply(&self, posts: &[PostRecord]) -> Vec<PostRecord> {
        posts
            .iter()
            .filter(|post| self.matches(post))
            .cloned()
            .collect()
    }
}

/// Tracks the query string currently shown in the browser and computes the
/// next one for a selection, suppressing navigations that change nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySync {
    current: String,
}

impl QuerySync {
    /// Start from the query string the page was loaded with.
    pub fn from_location(query: &str) -> Self {
        Self {
            current: normalize(query),
        }
    }

    /// Query string without the leading `?`; empty when there is none.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Rewrite the `category` parameters to mirror `selection`, keeping any
    /// other parameter in place. Returns the new location search (`""` or
    /// `"?..."`) only when it differs from the current one.
    pub fn sync(&mut self, selection: &CategorySelection) -> Option<String> {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in parse_query(&self.current) {
            if key != CATEGORY_PARAM {
                serializer.append_pair(&key, &value);
            }
        }
        for name in selection.iter() {
            serializer.append_pair(CATEGORY_PARAM, name);
        }
        self.navigate(serializer.finish())
    }

    /// Drop the whole query string.
    pub fn clear(&mut self) -> Option<String> {
        self.navigate(String::new())
    }

    fn navigate(&mut self, next: String) -> Option<String> {
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(self.search())
    }

    /// Location search form of the current query (`""` or `"?..."`).
    pub fn search(&self) -> String {
        if self.current.is_empty() {
            String::new()
        } else {
            format!("?{}", self.current)
        }
    }
}

fn normalize(query: &str) -> String {
    query.trim_start_matches('?').to_string()
}

fn parse_query(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
}
