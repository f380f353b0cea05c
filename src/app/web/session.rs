//! Session cookie handling.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::app::AppContext;
use crate::domain::{AppError, SessionId};

pub const SESSION_COOKIE: &str = "guidia_session";

/// Attach the caller's session to the request, creating one if the cookie is
/// missing or unknown. The cookie has no max-age, so it ends with the browser
/// session.
pub async fn resolve_session(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let known = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| SessionId::parse(cookie.value()))
        .filter(|id| ctx.sessions().touch(id));

    let (session, jar) = match known {
        Some(id) => (id, jar),
        None => {
            let id = ctx.sessions().create();
            let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict);
            (id, jar.add(cookie))
        }
    };

    request.extensions_mut().insert(session);
    let response = next.run(request).await;
    (jar, response).into_response()
}

/// The session resolved by [`resolve_session`].
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionId);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionId>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AppError::SessionNotFound)
    }
}

/// API calls other than register and login need a signed-in session.
pub fn ensure_signed_in(ctx: &AppContext, session: &SessionId) -> Result<(), AppError> {
    if ctx.sessions().get(session)?.authenticated {
        Ok(())
    } else {
        Err(AppError::Unauthenticated)
    }
}
