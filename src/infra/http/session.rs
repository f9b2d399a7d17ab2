//! Browser session cookie.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use crate::application::session::SessionId;

pub const SESSION_COOKIE: &str = "lizard_session";

/// Resolve the request's [`SessionId`] from its cookie, issuing a new one when
/// the cookie is missing or unreadable. The id is stored in the request
/// extensions for handlers and later middleware.
pub async fn attach_session(jar: CookieJar, mut request: Request<Body>, next: Next) -> Response {
    let existing = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<SessionId>().ok());
    let session = existing.unwrap_or_default();
    request.extensions_mut().insert(session);

    let response = next.run(request).await;
    if existing.is_some() {
        return response;
    }

    debug!(target = "lizard::http::session", session = %session, "issued session");
    (jar.add(session_cookie(session)), response).into_response()
}

fn session_cookie(session: SessionId) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
