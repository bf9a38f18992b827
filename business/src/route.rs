//! Pages of the console and which of them need a session.

use serde::{Deserialize, Serialize};

use crate::session::{Guarded, Session};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Sign-in form; also the landing page.
    #[default]
    Login,
    /// Create-account form.
    Register,
    /// User management table.
    Home,
}

impl Route {
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Home)
    }

    /// Maps a web path such as `/login` to its route.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" | "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/home" => Some(Self::Home),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Home => "/home",
        }
    }
}

impl Session {
    /// The page to actually display when `route` is requested.
    pub fn resolve(&self, route: Route) -> Route {
        if !route.is_protected() {
            return route;
        }
        match self.guard(route) {
            Guarded::View(route) => route,
            Guarded::RedirectToLogin => Route::Login,
        }
    }
}
