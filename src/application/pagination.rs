//! Incremental "load more" window over the filtered posts.

use std::ops::Range;

/// Number of posts shown initially and revealed by each `load_more`.
pub const PAGE_STEP: usize = 5;

/// Count of filtered posts currently rendered.
///
/// The count only grows within a mount. It is not clamped to the filtered
/// length: when a filter shrinks the list below the count, slicing saturates
/// and every remaining post is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    visible: usize,
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibleWindow {
    pub fn new() -> Self {
        Self { visible: PAGE_STEP }
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Reveal `PAGE_STEP` more positions and return the range that became
    /// visible (positions, not necessarily backed by posts).
    pub fn load_more(&mut self) -> Range<usize> {
        let start = self.visible;
        self.visible = self.visible.saturating_add(PAGE_STEP);
        start..self.visible
    }

    /// Whether the LOAD MORE control should be offered for `total` posts.
    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    /// The visible prefix of `items`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }

    /// Items in `range` that actually exist in `items`.
    pub fn revealed<'a, T>(&self, items: &'a [T], range: Range<usize>) -> &'a [T] {
        let start = range.start.min(items.len());
        let end = range.end.min(items.len());
        &items[start..end]
    }
}
