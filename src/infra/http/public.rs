use axum::{
    Extension, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware,
    response::Response,
    routing::{get, post},
};

use crate::{
    application::session::SessionId,
    infra::assets::serve_static_asset,
    presentation::views::{
        BrandView, DetailShell, DetailTemplate, HomeShell, IndexTemplate, LayoutContext,
        render_not_found_response, render_template_response,
    },
};

use super::{
    HttpState,
    middleware::{log_responses, set_request_context},
    session::attach_session,
    ui,
};

pub fn build_router(state: HttpState) -> Router {
    let pages = Router::new()
        .route("/", get(index))
        .route("/detail/{id}", get(detail_page));

    let actions = Router::new()
        .route("/ui/views/{view}/load", get(ui::load_home))
        .route("/ui/views/{view}/filters/toggle", post(ui::toggle_filter))
        .route("/ui/views/{view}/filters/clear", post(ui::clear_filters))
        .route("/ui/views/{view}/filters/reset", post(ui::reset_filters))
        .route("/ui/views/{view}/location", post(ui::sync_location))
        .route("/ui/views/{view}/more", post(ui::load_more))
        .route("/ui/views/{view}/unmount", post(ui::unmount))
        .route("/ui/detail/{id}", get(ui::load_detail));

    let static_routes = Router::new()
        .route("/_health", get(health))
        .route("/static/{*path}", get(serve_static_asset));

    pages
        .merge(actions)
        .merge(static_routes)
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(attach_session))
        .layer(middleware::from_fn(set_request_context))
}

/// Mount a list view for this page load and render its loading shell. A
/// full load of the list refetches the posts; the detail page reuses them.
async fn index(
    State(state): State<HttpState>,
    Extension(session): Extension<SessionId>,
    RawQuery(query): RawQuery,
) -> Response {
    state.provider.invalidate(session);
    let view = state.mounts.mount(session, query.as_deref().unwrap_or(""));
    let template = IndexTemplate {
        view: LayoutContext::new(BrandView::resetting(view), HomeShell::new(view)),
    };
    let mut response = render_template_response(template, StatusCode::OK);
    set_no_store(&mut response);
    response
}

async fn detail_page(Path(id): Path<String>) -> Response {
    let template = DetailTemplate {
        view: LayoutContext::new(BrandView::link(), DetailShell::new(&id)),
    };
    render_template_response(template, StatusCode::OK)
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback() -> Response {
    render_not_found_response()
}

fn set_no_store(response: &mut Response) {
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
}
