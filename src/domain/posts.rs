use std::collections::HashSet;

use time::{format_description::FormatItem, macros::format_description};

use crate::domain::entities::PostRecord;

/// Short numeric date shown on post cards.
pub const CARD_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

/// Distinct category names across `posts`, in first-seen order.
pub fn distinct_category_names(posts: &[PostRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for name in posts.iter().flat_map(PostRecord::category_names) {
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Locate a post by its identifier.
pub fn find_by_id<'a>(posts: &'a [PostRecord], id: &str) -> Option<&'a PostRecord> {
    posts.iter().find(|post| post.id == id)
}
