//! Page handlers. Every page passes through the route guard.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::app::AppContext;
use crate::domain::route::guard;
use crate::domain::{AppError, Route};

use super::session::CurrentSession;

fn render(ctx: &AppContext, session: &CurrentSession, route: Route) -> Result<Response, AppError> {
    let state = ctx.sessions().get(&session.0)?;
    if let Some(target) = guard(route.path(), state.authenticated) {
        return Ok(Redirect::to(target.path()).into_response());
    }
    Ok(Html(ctx.pages().render(route, &state)?).into_response())
}

macro_rules! page_handler {
    ($name:ident, $route:expr) => {
        pub async fn $name(
            State(ctx): State<AppContext>,
            session: CurrentSession,
        ) -> Result<Response, AppError> {
            render(&ctx, &session, $route)
        }
    };
}

page_handler!(profile, Route::Profile);
page_handler!(login, Route::Login);
page_handler!(register, Route::Register);
page_handler!(assistant, Route::Assistant);
page_handler!(about, Route::About);
page_handler!(feedback, Route::Feedback);
page_handler!(terms, Route::Terms);
page_handler!(privacy, Route::Privacy);

/// Unknown paths count as protected pages.
pub async fn fallback(
    State(ctx): State<AppContext>,
    session: CurrentSession,
    uri: Uri,
) -> Result<Response, AppError> {
    let state = ctx.sessions().get(&session.0)?;
    if let Some(target) = guard(uri.path(), state.authenticated) {
        return Ok(Redirect::to(target.path()).into_response());
    }
    Ok((StatusCode::NOT_FOUND, Html("<h1>Page not found</h1>")).into_response())
}
