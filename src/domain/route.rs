//! Named pages and the guard that decides who may see them.

use std::fmt;

/// Pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Default landing page.
    Profile,
    Login,
    Register,
    Assistant,
    About,
    Feedback,
    Terms,
    Privacy,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Profile,
        Route::Login,
        Route::Register,
        Route::Assistant,
        Route::About,
        Route::Feedback,
        Route::Terms,
        Route::Privacy,
    ];

    /// Page signed-in users land on.
    pub const LANDING: Route = Route::Profile;

    pub fn path(&self) -> &'static str {
        match self {
            Route::Profile => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Assistant => "/assistant",
            Route::About => "/about",
            Route::Feedback => "/feedback",
            Route::Terms => "/terms",
            Route::Privacy => "/privacy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Profile => "Profile",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Assistant => "AI Assistant",
            Route::About => "About us",
            Route::Feedback => "Feedback",
            Route::Terms => "Terms and Conditions",
            Route::Privacy => "Privacy Policy",
        }
    }

    /// Resolve a request path, ignoring a trailing slash.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|route| route.path() == normalized)
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decide where a navigation to `path` must be redirected, if anywhere.
///
/// Evaluated on every request. Paths that are not a known page count as
/// protected.
pub fn guard(path: &str, authenticated: bool) -> Option<Route> {
    let public = Route::from_path(path).is_some_and(|route| route.is_public());
    match (public, authenticated) {
        (false, false) => Some(Route::Login),
        (true, true) => Some(Route::LANDING),
        _ => None,
    }
}
