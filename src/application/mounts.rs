//! Registry of mounted list views.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use metrics::gauge;
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::application::browse::HomeView;
use crate::application::session::{SessionId, ViewId};
use crate::util::lock::mutex_lock;

const SOURCE: &str = "application::mounts";

pub type SharedView = Arc<AsyncMutex<HomeView>>;

/// LRU-bounded map from [`ViewId`] to view state. Eviction counts as an
/// unmount.
pub struct MountRegistry {
    views: Mutex<LruCache<ViewId, (SessionId, SharedView)>>,
}

impl MountRegistry {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            views: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Mount a fresh view for `session` and return its id.
    pub fn mount(&self, session: SessionId, location_query: &str) -> ViewId {
        let view = HomeView::mount(session, location_query);
        let id = view.id();
        let (evicted, mounted) = {
            let mut views = mutex_lock(&self.views, SOURCE, "mount");
            let evicted = views.push(id, (session, Arc::new(AsyncMutex::new(view))));
            (evicted, views.len())
        };
        gauge!("lizard_mounted_views").set(mounted as f64);
        if let Some((evicted, _)) = evicted.filter(|(evicted, _)| *evicted != id) {
            debug!(target = "lizard::views", view = %evicted, "evicted mounted view");
        }
        debug!(target = "lizard::views", view = %id, session = %session, "mounted view");
        id
    }

    /// The view `id` when it is still mounted and belongs to `session`.
    pub fn get(&self, session: SessionId, id: ViewId) -> Option<SharedView> {
        let mut views = mutex_lock(&self.views, SOURCE, "get");
        match views.get(&id) {
            Some((owner, view)) if *owner == session => Some(Arc::clone(view)),
            _ => None,
        }
    }

    /// Drop view `id`. Returns whether it was mounted for `session`.
    pub fn unmount(&self, session: SessionId, id: ViewId) -> bool {
        let mut views = mutex_lock(&self.views, SOURCE, "unmount");
        let owned = matches!(views.peek(&id), Some((owner, _)) if *owner == session);
        if owned {
            views.pop(&id);
            gauge!("lizard_mounted_views").set(views.len() as f64);
            debug!(target = "lizard::views", view = %id, "unmounted view");
        }
        owned
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.views, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(capacity: usize) -> MountRegistry {
        MountRegistry::new(NonZeroUsize::new(capacity).expect("non-zero capacity"))
    }

    #[tokio::test]
    async fn mounted_view_keeps_its_query() {
        let registry = registry(4);
        let session = SessionId::new();
        let id = registry.mount(session, "?category=Tech");

        let view = registry.get(session, id).expect("mounted");
        let view = view.lock().await;
        assert!(view.is_selected("Tech"));
        assert_eq!(view.id(), id);
    }

    #[test]
    fn views_belong_to_their_session() {
        let registry = registry(4);
        let owner = SessionId::new();
        let id = registry.mount(owner, "");

        assert!(registry.get(SessionId::new(), id).is_none());
        assert!(!registry.unmount(SessionId::new(), id));
        assert!(registry.get(owner, id).is_some());
    }

    #[tokio::test]
    async fn fetch_resolving_after_unmount_finds_no_view() {
        let registry = registry(4);
        let session = SessionId::new();
        let id = registry.mount(session, "");

        let ticket = {
            let view = registry.get(session, id).expect("mounted");
            let mut view = view.lock().await;
            view.begin_load()
        };

        assert!(registry.unmount(session, id));
        assert!(registry.get(session, ticket.view()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn eviction_unmounts_the_oldest_view() {
        let registry = registry(2);
        let session = SessionId::new();
        let first = registry.mount(session, "");
        let second = registry.mount(session, "");
        let third = registry.mount(session, "");

        assert!(registry.get(session, first).is_none());
        assert!(registry.get(session, second).is_some());
        assert!(registry.get(session, third).is_some());
        assert_eq!(registry.len(), 2);
    }
}
