//! State of one mounted list view.
//!
//! A `HomeView` owns the category selection, the query string mirror, the
//! visible window and the filtered subset of the catalog. Catalog results
//! are applied through a [`LoadTicket`] so that only the latest load of the
//! view can publish.

use std::sync::Arc;

use crate::application::filters::{CategorySelection, QuerySync};
use crate::application::pagination::VisibleWindow;
use crate::application::session::{SessionId, ViewId};
use crate::application::store::{LoadState, PostCatalog};
use crate::domain::entities::PostRecord;

/// Token handed out by [`HomeView::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    view: ViewId,
    generation: u64,
}

impl LoadTicket {
    pub fn view(&self) -> ViewId {
        self.view
    }
}

/// What the browser location should do after a filter action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Unchanged,
    /// Push a history entry with this location search (`""` or `"?..."`).
    Push(String),
}

impl From<Option<String>> for Navigation {
    fn from(search: Option<String>) -> Self {
        match search {
            Some(search) => Navigation::Push(search),
            None => Navigation::Unchanged,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomeView {
    id: ViewId,
    session: SessionId,
    generation: u64,
    state: LoadState<Arc<PostCatalog>>,
    selection: CategorySelection,
    query: QuerySync,
    window: VisibleWindow,
    filtered: Vec<PostRecord>,
}

impl HomeView {
    /// Mount a view for the location query the page was requested with.
    pub fn mount(session: SessionId, location_query: &str) -> Self {
        Self {
            id: ViewId::new(),
            session,
            generation: 0,
            state: LoadState::Loading,
            selection: CategorySelection::from_query(location_query),
            query: QuerySync::from_location(location_query),
            window: VisibleWindow::new(),
            filtered: Vec::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn state(&self) -> &LoadState<Arc<PostCatalog>> {
        &self.state
    }

    /// Enter `Loading` and invalidate every ticket handed out before.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            view: self.id,
            generation: self.generation,
        }
    }

    /// Publish a load result. Returns `false`, leaving the view untouched,
    /// when `ticket` is not the latest one of this view.
    pub fn apply_catalog(
        &mut self,
        ticket: LoadTicket,
        result: Result<Arc<PostCatalog>, String>,
    ) -> bool {
        if ticket.view != self.id || ticket.generation != self.generation {
            return false;
        }
        match result {
            Ok(catalog) => {
                self.state = LoadState::Loaded(catalog);
                self.refilter();
            }
            Err(reason) => {
                self.state = LoadState::Failed(reason);
                self.filtered.clear();
            }
        }
        true
    }

    /// Toggle `name` in the selection and mirror it into the query string.
    pub fn toggle(&mut self, name: &str) -> Navigation {
        self.selection.toggle(name);
        self.refilter();
        self.query.sync(&self.selection).into()
    }

    /// Empty the selection and drop the whole query string.
    pub fn clear(&mut self) -> Navigation {
        self.selection.clear();
        self.refilter();
        self.query.clear().into()
    }

    /// Adopt the query string the browser moved to through its history.
    /// The location already changed, so no navigation is produced.
    pub fn sync_location(&mut self, location_query: &str) {
        self.selection = CategorySelection::from_query(location_query);
        self.query = QuerySync::from_location(location_query);
        self.refilter();
    }

    /// Grow the window and return the posts it newly reveals.
    pub fn load_more(&mut self) -> &[PostRecord] {
        let range = self.window.load_more();
        self.window.revealed(&self.filtered, range)
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selection.contains(name)
    }

    /// Categories of the loaded catalog; empty until it is loaded.
    pub fn categories(&self) -> &[String] {
        self.state
            .loaded()
            .map(|catalog| catalog.categories())
            .unwrap_or(&[])
    }

    pub fn filtered(&self) -> &[PostRecord] {
        &self.filtered
    }

    pub fn visible_posts(&self) -> &[PostRecord] {
        self.window.slice(&self.filtered)
    }

    pub fn visible_count(&self) -> usize {
        self.window.visible_count()
    }

    pub fn has_more(&self) -> bool {
        self.window.has_more(self.filtered.len())
    }

    /// Location search currently mirrored by the view.
    pub fn search(&self) -> String {
        self.query.search()
    }

    fn refilter(&mut self) {
        self.filtered = match self.state.loaded() {
            Some(catalog) => self.selection.apply(catalog.posts()),
            None => Vec::new(),
        };
    }
}
