use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use lizard::application::mounts::MountRegistry;
use lizard::application::provider::{PostProvider, PostSource, SourceError, StaticPostSource};
use lizard::domain::entities::{AuthorRecord, CategoryRecord, PostRecord};
use lizard::infra::http::{HttpState, SESSION_COOKIE, build_router};
use time::macros::datetime;
use tower::ServiceExt;

fn post(id: &str, categories: &[&str]) -> PostRecord {
    PostRecord {
        id: id.to_string(),
        title: format!("Post {id}"),
        summary: format!("Summary of {id}"),
        published_at: datetime!(2024-05-01 08:00 UTC),
        author: AuthorRecord {
            name: "Ana".to_string(),
            avatar: "https://example.test/ana.png".to_string(),
        },
        categories: categories
            .iter()
            .map(|name| CategoryRecord {
                id: format!("c-{name}"),
                name: (*name).to_string(),
            })
            .collect(),
    }
}

fn sample_posts() -> Vec<PostRecord> {
    vec![
        post("p1", &["Tech"]),
        post("p2", &["Sport"]),
        post("p3", &["Tech", "Sport"]),
        post("p4", &["Voyage"]),
        post("p5", &["Tech"]),
        post("p6", &["Sport"]),
        post("p7", &["Tech"]),
    ]
}

struct FailingSource;

#[async_trait]
impl PostSource for FailingSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        Err(SourceError::Status { status: 503 })
    }
}

struct CountingSource {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PostSource for CountingSource {
    async fn fetch_posts(&self) -> Result<Vec<PostRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(sample_posts())
    }
}

fn router_with(source: Arc<dyn PostSource>) -> Router {
    let capacity = NonZeroUsize::new(16).expect("non-zero");
    let provider = Arc::new(PostProvider::new(source, capacity));
    let mounts = Arc::new(MountRegistry::new(capacity));
    build_router(HttpState::new(provider, mounts))
}

fn router() -> Router {
    router_with(Arc::new(StaticPostSource::new(sample_posts())))
}

fn request(method: Method, uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={session}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router should respond")
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn session_from(response: &Response<Body>) -> String {
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie issued");
    let value = cookie
        .strip_prefix(&format!("{SESSION_COOKIE}="))
        .expect("cookie name");
    value.split(';').next().expect("cookie value").to_string()
}

fn view_from(page: &str) -> String {
    let start = page.find("/ui/views/").expect("view actions rendered") + "/ui/views/".len();
    page[start..start + 36].to_string()
}

/// Load the index page and return `(session, view)`.
async fn mount(app: &Router, uri: &str) -> (String, String) {
    let response = send(app, request(Method::GET, uri, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = session_from(&response);
    let page = body_text(response).await;
    (session, view_from(&page))
}

#[tokio::test]
async fn index_renders_shell_and_issues_session() {
    let app = router();
    let response = send(&app, request(Method::GET, "/", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok()),
        Some("no-store")
    );
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("cookie")
        .to_string();
    assert!(cookie.contains("HttpOnly"));

    let page = body_text(response).await;
    assert!(page.contains("Filtrer par catégories"));
    assert!(page.contains("Loading..."));
    assert!(page.contains("sendBeacon"));
}

#[tokio::test]
async fn load_streams_filters_and_first_page() {
    let app = router();
    let (session, view) = mount(&app, "/").await;

    let response = send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let events = body_text(response).await;

    for category in ["Tech", "Sport", "Voyage"] {
        assert!(events.contains(category), "missing category {category}");
    }
    assert!(events.contains("Post p5"));
    assert!(!events.contains("Post p6"));
    assert!(events.contains("LOAD MORE"));
}

#[tokio::test]
async fn load_more_appends_the_rest() {
    let app = router();
    let (session, view) = mount(&app, "/").await;
    send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;

    let response = send(
        &app,
        request(Method::POST, &format!("/ui/views/{view}/more"), Some(&session)),
    )
    .await;
    let events = body_text(response).await;

    assert!(events.contains("Post p6"));
    assert!(events.contains("Post p7"));
    assert!(events.contains("append"));
    assert!(!events.contains("LOAD MORE"));
}

#[tokio::test]
async fn toggle_pushes_history_and_redundant_clear_does_not() {
    let app = router();
    let (session, view) = mount(&app, "/").await;
    send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;

    let toggled = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/toggle?name=Tech"),
            Some(&session),
        ),
    )
    .await;
    let events = body_text(toggled).await;
    assert!(events.contains("pushState"));
    assert!(events.contains("?category=Tech"));
    assert!(!events.contains("Post p2"));

    let cleared = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/clear"),
            Some(&session),
        ),
    )
    .await;
    assert!(body_text(cleared).await.contains("pushState"));

    let again = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/clear"),
            Some(&session),
        ),
    )
    .await;
    assert!(!body_text(again).await.contains("pushState"));
}

#[tokio::test]
async fn categories_from_the_url_preselect_filters() {
    let app = router();
    let (session, view) = mount(&app, "/?category=Voyage").await;

    let response = send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;
    let events = body_text(response).await;

    assert!(events.contains("Post p4"));
    assert!(!events.contains("Post p1"));
    assert!(events.contains("checked"));
}

#[tokio::test]
async fn foreign_session_is_told_to_reload() {
    let app = router();
    let (_, view) = mount(&app, "/").await;
    let (intruder, _) = mount(&app, "/").await;

    let response = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/clear"),
            Some(&intruder),
        ),
    )
    .await;
    assert!(body_text(response).await.contains("window.location.reload()"));
}

#[tokio::test]
async fn unmounted_view_reloads_on_next_action() {
    let app = router();
    let (session, view) = mount(&app, "/").await;

    let response = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/unmount"),
            Some(&session),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;
    assert!(body_text(response).await.contains("window.location.reload()"));
}

#[tokio::test]
async fn failed_listing_offers_retry() {
    let app = router_with(Arc::new(FailingSource));
    let (session, view) = mount(&app, "/").await;

    let response = send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;
    let events = body_text(response).await;

    assert!(events.contains("RETRY"));
    assert!(events.contains("503"));
}

#[tokio::test]
async fn detail_resolves_known_and_unknown_posts() {
    let app = router();

    let page = send(&app, request(Method::GET, "/detail/p3", None)).await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(body_text(page).await.contains("/ui/detail/p3"));

    let found = send(&app, request(Method::GET, "/ui/detail/p3", None)).await;
    let events = body_text(found).await;
    assert!(events.contains("Post p3"));
    assert!(events.contains("Summary of p3"));

    let missing = send(&app, request(Method::GET, "/ui/detail/xyz", None)).await;
    assert!(body_text(missing).await.contains("introuvable"));
}

#[tokio::test]
async fn health_static_and_fallback() {
    let app = router();

    let health = send(&app, request(Method::GET, "/_health", None)).await;
    assert_eq!(health.status(), StatusCode::NO_CONTENT);

    let css = send(&app, request(Method::GET, "/static/app.css", None)).await;
    assert_eq!(css.status(), StatusCode::OK);
    assert_eq!(
        css.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/css")
    );

    let missing = send(&app, request(Method::GET, "/nowhere", None)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert!(body_text(missing).await.contains("Page introuvable"));
}

#[tokio::test]
async fn logo_resets_filters_on_the_list_surface() {
    let app = router();
    let response = send(&app, request(Method::GET, "/?category=Tech", None)).await;
    let session = session_from(&response);
    let page = body_text(response).await;
    let view = view_from(&page);
    assert!(page.contains(&format!("/ui/views/{view}/filters/reset")));

    let loaded = send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;
    assert!(!body_text(loaded).await.contains("Post p2"));

    let reset = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/reset"),
            Some(&session),
        ),
    )
    .await;
    let events = body_text(reset).await;
    for id in ["p1", "p2", "p3", "p4", "p5"] {
        assert!(events.contains(&format!("Post {id}")), "missing post {id}");
    }
    assert!(events.contains("LOAD MORE"));
    assert!(events.contains("window.location.pathname + \"\""));
}

#[tokio::test]
async fn history_navigation_resyncs_the_view() {
    let app = router();
    let (session, view) = mount(&app, "/").await;
    send(
        &app,
        request(Method::GET, &format!("/ui/views/{view}/load"), Some(&session)),
    )
    .await;
    send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/toggle?name=Tech"),
            Some(&session),
        ),
    )
    .await;

    let back = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/location?search="),
            Some(&session),
        ),
    )
    .await;
    let events = body_text(back).await;
    assert!(events.contains("Post p2"));
    assert!(!events.contains("pushState"));

    let toggled = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/filters/toggle?name=Sport"),
            Some(&session),
        ),
    )
    .await;
    let events = body_text(toggled).await;
    assert!(events.contains("window.location.pathname + \"?category=Sport\""));
    assert!(!events.contains("Post p1"));

    let forward = send(
        &app,
        request(
            Method::POST,
            &format!("/ui/views/{view}/location?search=%3Fcategory%3DTech"),
            Some(&session),
        ),
    )
    .await;
    let events = body_text(forward).await;
    assert!(events.contains("Post p1"));
    assert!(!events.contains("Post p2"));
    assert!(!events.contains("pushState"));
}

#[tokio::test]
async fn index_listens_for_history_navigation() {
    let app = router();
    let response = send(&app, request(Method::GET, "/", None)).await;
    let page = body_text(response).await;
    assert!(page.contains("data-on:popstate__window"));
    assert!(page.contains("/location?search="));
}

#[tokio::test]
async fn list_remount_refetches_while_detail_reuses_the_catalog() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router_with(Arc::new(CountingSource {
        calls: Arc::clone(&calls),
    }));

    let (session, first) = mount(&app, "/").await;
    send(
        &app,
        request(Method::GET, &format!("/ui/views/{first}/load"), Some(&session)),
    )
    .await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let detail = send(&app, request(Method::GET, "/ui/detail/p2", Some(&session))).await;
    assert!(body_text(detail).await.contains("Post p2"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let page = send(&app, request(Method::GET, "/", Some(&session))).await;
    let second = view_from(&body_text(page).await);
    send(
        &app,
        request(Method::GET, &format!("/ui/views/{second}/load"), Some(&session)),
    )
    .await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
