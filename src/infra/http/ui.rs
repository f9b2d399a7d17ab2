//! Datastar actions of the list and detail surfaces.
//!
//! Every handler answers with an SSE stream of element patches. Actions for
//! a view that is no longer mounted answer with a reload so the page mounts a
//! fresh one.

use axum::{
    Extension,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use datastar::prelude::ElementPatchMode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    application::{
        browse::{HomeView, Navigation},
        detail::DetailState,
        error::HttpError,
        mounts::SharedView,
        session::{SessionId, ViewId},
        store::LoadState,
        stream::StreamBuilder,
    },
    presentation::views::{
        DetailBodyPartial, FiltersPartial, ListErrorPartial, LoadMorePartial, PostCardsPartial,
        PostListPartial, render_fragment,
    },
};

use super::HttpState;

const FILTERS_SELECTOR: &str = "#filters";
const POST_LIST_SELECTOR: &str = "#post-list";
const LOAD_MORE_SELECTOR: &str = "#load-more";
const DETAIL_BODY_SELECTOR: &str = "#detail-body";

#[derive(Debug, Deserialize)]
pub(super) struct ToggleQuery {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationQuery {
    #[serde(default)]
    search: String,
}

pub(super) async fn load_home(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
) -> Result<Response, HttpError> {
    let Some(view) = mounted_view(&state, session, &raw_view) else {
        return Ok(reload_response(&raw_view));
    };

    let ticket = view.lock().await.begin_load();
    let result = state
        .provider
        .catalog(session)
        .await
        .map_err(|err| err.to_string());

    if state.mounts.get(session, ticket.view()).is_none() {
        debug!(
            target = "lizard::http::ui",
            view = %ticket.view(),
            "view unmounted before its posts resolved"
        );
        return Ok(StreamBuilder::new().into_response());
    }

    let mut view = view.lock().await;
    if !view.apply_catalog(ticket, result) {
        debug!(
            target = "lizard::http::ui",
            view = %ticket.view(),
            "discarding superseded load"
        );
        return Ok(StreamBuilder::new().into_response());
    }

    Ok(home_patches(&view)?.into_response())
}

pub(super) async fn toggle_filter(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
    Query(query): Query<ToggleQuery>,
) -> Result<Response, HttpError> {
    let Some(view) = mounted_view(&state, session, &raw_view) else {
        return Ok(reload_response(&raw_view));
    };

    let mut view = view.lock().await;
    let navigation = view.toggle(&query.name);
    filter_response(&view, navigation)
}

pub(super) async fn clear_filters(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
) -> Result<Response, HttpError> {
    let Some(view) = mounted_view(&state, session, &raw_view) else {
        return Ok(reload_response(&raw_view));
    };

    let mut view = view.lock().await;
    let navigation = view.clear();
    filter_response(&view, navigation)
}

/// Logo click on the list surface.
pub(super) async fn reset_filters(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
) -> Result<Response, HttpError> {
    let Some(view) = mounted_view(&state, session, &raw_view) else {
        return Ok(reload_response(&raw_view));
    };

    let mut view = view.lock().await;
    info!(
        target = "lizard::http::ui",
        view = %view.id(),
        selected = view.selection().len(),
        "resetting filters"
    );
    let navigation = view.clear();
    filter_response(&view, navigation)
}

/// Browser moved through its history; the view follows the location.
pub(super) async fn sync_location(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
    Query(query): Query<LocationQuery>,
) -> Result<Response, HttpError> {
    let Some(view) = mounted_view(&state, session, &raw_view) else {
        return Ok(reload_response(&raw_view));
    };

    let mut view = view.lock().await;
    view.sync_location(&query.search);
    debug!(
        target = "lizard::http::ui",
        view = %view.id(),
        search = %query.search,
        "view followed history navigation"
    );
    filter_response(&view, Navigation::Unchanged)
}

pub(super) async fn load_more(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
) -> Result<Response, HttpError> {
    let Some(view) = mounted_view(&state, session, &raw_view) else {
        return Ok(reload_response(&raw_view));
    };

    let mut view = view.lock().await;
    let cards = PostCardsPartial::revealed(view.load_more());

    let mut builder = StreamBuilder::new();
    if !cards.posts.is_empty() {
        builder.push_patch(
            render_fragment(cards)?,
            POST_LIST_SELECTOR,
            ElementPatchMode::Append,
        );
    }
    builder.push_patch(
        render_fragment(LoadMorePartial::from_view(&view))?,
        LOAD_MORE_SELECTOR,
        ElementPatchMode::Outer,
    );
    Ok(builder.into_response())
}

/// Beacon sent when the page is hidden for good.
pub(super) async fn unmount(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(raw_view): Path<String>,
) -> StatusCode {
    if let Ok(view) = raw_view.parse::<ViewId>() {
        state.mounts.unmount(session, view);
    }
    StatusCode::NO_CONTENT
}

pub(super) async fn load_detail(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let catalog = state.provider.catalog(session).await;
    let detail = DetailState::resolve(
        catalog.as_deref().map_err(|err| err.to_string()),
        &id,
    );
    if matches!(detail, DetailState::NotFound) {
        debug!(target = "lizard::http::ui", post = %id, "post not found");
    }

    let mut builder = StreamBuilder::new();
    if let Some(body) = DetailBodyPartial::from_state(&detail) {
        builder.push_patch(
            render_fragment(body)?,
            DETAIL_BODY_SELECTOR,
            ElementPatchMode::Outer,
        );
    }
    Ok(builder.into_response())
}

fn mounted_view(state: &HttpState, session: SessionId, raw_view: &str) -> Option<SharedView> {
    let view = raw_view.parse::<ViewId>().ok()?;
    state.mounts.get(session, view)
}

fn reload_response(raw_view: &str) -> Response {
    debug!(
        target = "lizard::http::ui",
        view = raw_view,
        "action for a view that is not mounted, reloading"
    );
    let mut builder = StreamBuilder::new();
    builder.push_reload();
    builder.into_response()
}

fn filter_response(view: &HomeView, navigation: Navigation) -> Result<Response, HttpError> {
    let mut builder = home_patches(view)?;
    if let Navigation::Push(search) = navigation {
        builder.push_history(&search);
    }
    Ok(builder.into_response())
}

/// Patches bringing the list surface in line with `view`.
fn home_patches(view: &HomeView) -> Result<StreamBuilder, HttpError> {
    let mut builder = StreamBuilder::new();
    match view.state() {
        LoadState::Loading => {}
        LoadState::Loaded(_) => {
            builder
                .push_patch(
                    render_fragment(FiltersPartial::from_view(view))?,
                    FILTERS_SELECTOR,
                    ElementPatchMode::Outer,
                )
                .push_patch(
                    render_fragment(PostListPartial::from_view(view))?,
                    POST_LIST_SELECTOR,
                    ElementPatchMode::Outer,
                )
                .push_patch(
                    render_fragment(LoadMorePartial::from_view(view))?,
                    LOAD_MORE_SELECTOR,
                    ElementPatchMode::Outer,
                );
        }
        LoadState::Failed(reason) => {
            builder
                .push_patch(
                    render_fragment(ListErrorPartial::new(view.id(), reason.clone()))?,
                    POST_LIST_SELECTOR,
                    ElementPatchMode::Outer,
                )
                .push_patch(
                    render_fragment(LoadMorePartial {
                        visible: false,
                        action: String::new(),
                    })?,
                    LOAD_MORE_SELECTOR,
                    ElementPatchMode::Outer,
                );
        }
    }
    Ok(builder)
}
