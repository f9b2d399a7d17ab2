use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::{
    browse::HomeView,
    detail::DetailState,
    error::{ErrorReport, HttpError},
    scroll::ScrollToTop,
    session::ViewId,
};
use crate::domain::{entities::PostRecord, posts::CARD_DATE_FORMAT};
use crate::presentation::routes;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

/// Render a fragment destined for an SSE element patch.
pub fn render_fragment<T: Template>(template: T) -> Result<String, HttpError> {
    render_template(template).map(|Html(body)| body)
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let view = LayoutContext::new(BrandView::link(), ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Header logo. On the list surface it also resets the filters in place.
#[derive(Clone)]
pub struct BrandView {
    pub href: String,
    pub reset_action: Option<String>,
}

impl BrandView {
    pub fn link() -> Self {
        Self {
            href: "/".to_string(),
            reset_action: None,
        }
    }

    pub fn resetting(view: ViewId) -> Self {
        Self {
            href: "/".to_string(),
            reset_action: Some(routes::post_action(&routes::reset_filters(view))),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(brand: BrandView, content: T) -> Self {
        Self { brand, content }
    }
}

#[derive(Clone)]
pub struct CategoryTag {
    pub name: String,
    pub href: String,
}

#[derive(Clone)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub author_name: String,
    pub author_avatar: String,
    pub iso_date: String,
    pub published: String,
    pub categories: Vec<CategoryTag>,
    pub detail_href: String,
    pub is_new: bool,
}

impl PostCard {
    pub fn from_record(post: &PostRecord) -> Self {
        let published = post
            .published_at
            .format(CARD_DATE_FORMAT)
            .unwrap_or_default();
        let iso_date = post
            .published_at
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();

        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            summary: post.summary.clone(),
            author_name: post.author.name.clone(),
            author_avatar: post.author.avatar.clone(),
            iso_date,
            published,
            categories: post
                .category_names()
                .map(|name| CategoryTag {
                    name: name.to_string(),
                    href: routes::home_with_categories([name]),
                })
                .collect(),
            detail_href: routes::detail_page(&post.id),
            is_new: false,
        }
    }

    /// Marks the card as freshly revealed so it animates in.
    pub fn revealed(mut self) -> Self {
        self.is_new = true;
        self
    }
}

// ----- List surface -----

pub struct HomeShell {
    pub load_action: String,
    pub location_action: String,
    pub unmount_url: String,
    pub show_scroll: bool,
    pub scroll_expression: String,
    pub scroll_action: String,
}

impl HomeShell {
    pub fn new(view: ViewId) -> Self {
        let scroll = ScrollToTop::new();
        Self {
            load_action: routes::get_action(&routes::home_load(view)),
            location_action: routes::sync_location_action(view),
            unmount_url: routes::unmount(view),
            show_scroll: scroll.is_visible(),
            scroll_expression: ScrollToTop::signal_expression(),
            scroll_action: scroll.scroll_action(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<HomeShell>,
}

#[derive(Clone)]
pub struct CategoryOption {
    pub name: String,
    pub checked: bool,
    pub toggle_action: String,
}

#[derive(Template)]
#[template(path = "partials/filters.html")]
pub struct FiltersPartial {
    pub categories: Vec<CategoryOption>,
    pub clear_action: String,
}

impl FiltersPartial {
    pub fn from_view(view: &HomeView) -> Self {
        let id = view.id();
        Self {
            categories: view
                .categories()
                .iter()
                .map(|name| CategoryOption {
                    name: name.clone(),
                    checked: view.is_selected(name),
                    toggle_action: routes::post_action(&routes::toggle_filter(id, name)),
                })
                .collect(),
            clear_action: routes::post_action(&routes::clear_filters(id)),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/post_list.html")]
pub struct PostListPartial {
    pub posts: Vec<PostCard>,
}

impl PostListPartial {
    pub fn from_view(view: &HomeView) -> Self {
        Self {
            posts: view.visible_posts().iter().map(PostCard::from_record).collect(),
        }
    }
}

/// Cards appended to the list by LOAD MORE.
#[derive(Template)]
#[template(path = "partials/post_cards.html")]
pub struct PostCardsPartial {
    pub posts: Vec<PostCard>,
}

impl PostCardsPartial {
    pub fn revealed(posts: &[PostRecord]) -> Self {
        Self {
            posts: posts
                .iter()
                .map(|post| PostCard::from_record(post).revealed())
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "partials/load_more.html")]
pub struct LoadMorePartial {
    pub visible: bool,
    pub action: String,
}

impl LoadMorePartial {
    pub fn from_view(view: &HomeView) -> Self {
        Self {
            visible: view.has_more(),
            action: routes::post_action(&routes::load_more(view.id())),
        }
    }
}

/// Replaces the post list while the catalog is unavailable.
#[derive(Template)]
#[template(path = "partials/list_error.html")]
pub struct ListErrorPartial {
    pub message: String,
    pub retry_action: String,
}

impl ListErrorPartial {
    pub fn new(view: ViewId, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retry_action: routes::get_action(&routes::home_load(view)),
        }
    }
}

// ----- Detail surface -----

pub struct DetailShell {
    pub load_action: String,
}

impl DetailShell {
    pub fn new(id: &str) -> Self {
        Self {
            load_action: routes::get_action(&routes::detail_load(id)),
        }
    }
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailTemplate {
    pub view: LayoutContext<DetailShell>,
}

#[derive(Template)]
#[template(path = "partials/detail_body.html")]
pub struct DetailBodyPartial {
    pub post: Option<PostCard>,
    pub not_found: bool,
    pub failure: Option<String>,
}

impl DetailBodyPartial {
    /// `None` while the state is still `Loading`; the shell already shows it.
    pub fn from_state(state: &DetailState) -> Option<Self> {
        let body = match state {
            DetailState::Loading => return None,
            DetailState::Found(post) => Self {
                post: Some(PostCard::from_record(post)),
                not_found: false,
                failure: None,
            },
            DetailState::NotFound => Self {
                post: None,
                not_found: true,
                failure: None,
            },
            DetailState::Failed(reason) => Self {
                post: None,
                not_found: false,
                failure: Some(reason.clone()),
            },
        };
        Some(body)
    }
}

// ----- Errors -----

pub struct ErrorPageView {
    pub status_code: u16,
    pub title: &'static str,
    pub message: &'static str,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            status_code: 404,
            title: "Page introuvable",
            message: "Cette page n'existe pas.",
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::domain::entities::{AuthorRecord, CategoryRecord};

    fn record() -> PostRecord {
        PostRecord {
            id: "p 1".to_string(),
            title: "Lézards & co".to_string(),
            summary: "Au soleil".to_string(),
            published_at: datetime!(2024-03-07 09:30 UTC),
            author: AuthorRecord {
                name: "Ana".to_string(),
                avatar: "https://example.test/ana.png".to_string(),
            },
            categories: vec![CategoryRecord {
                id: "c1".to_string(),
                name: "Nature".to_string(),
            }],
        }
    }

    #[test]
    fn card_formats_date_and_links() {
        let card = PostCard::from_record(&record());
        assert_eq!(card.published, "07/03/2024");
        assert_eq!(card.iso_date, "2024-03-07T09:30:00Z");
        assert_eq!(card.detail_href, "/detail/p%201");
        assert_eq!(card.categories[0].href, "/?category=Nature");
        assert!(!card.is_new);
        assert!(card.revealed().is_new);
    }

    #[test]
    fn card_markup_escapes_text() {
        let html = render_fragment(PostCardsPartial::revealed(&[record()])).expect("renders");
        assert!(html.contains("Lézards &#38; co"));
        assert!(!html.contains("& co"));
        assert!(html.contains("DETAILS"));
        assert!(html.contains("is-new"));
    }

    #[test]
    fn not_found_detail_renders_panel() {
        let body = DetailBodyPartial::from_state(&DetailState::NotFound).expect("resolved");
        let html = render_fragment(body).expect("renders");
        assert!(html.contains("id=\"detail-body\""));
        assert!(html.contains("introuvable"));
    }

    #[test]
    fn loading_detail_has_no_patch() {
        assert!(DetailBodyPartial::from_state(&DetailState::Loading).is_none());
    }

    #[test]
    fn not_found_page_carries_report() {
        let response = render_not_found_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }
}
