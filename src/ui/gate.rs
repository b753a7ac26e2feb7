//! Route model and access gating.

use crate::session::SessionState;

/// Client-visible routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Services,
    ServiceDetail(String),
    Login,
    Register,
    Profile,
    MyServices,
    AddService,
    MyBookings,
    NotFound(String),
}

impl Route {
    /// Parses a path as typed into the navigation bar.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" | "/" => Route::Home,
            "/services" => Route::Services,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/profile" => Route::Profile,
            "/myServices" => Route::MyServices,
            "/addService" => Route::AddService,
            "/myBookings" => Route::MyBookings,
            other => match other.strip_prefix("/services/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Route::ServiceDetail(id.to_string())
                }
                _ => Route::NotFound(path.trim().to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Services => "/services".to_string(),
            Route::ServiceDetail(id) => format!("/services/{id}"),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::MyServices => "/myServices".to_string(),
            Route::AddService => "/addService".to_string(),
            Route::MyBookings => "/myBookings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// True for routes that require a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::ServiceDetail(_)
                | Route::Profile
                | Route::MyServices
                | Route::AddService
                | Route::MyBookings
        )
    }
}

/// Outcome of gating a navigation against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the requested screen.
    Allow,
    /// Session still resolving: show a neutral placeholder, decide later.
    /// Never redirect here — that would flash the login screen at users
    /// whose session is about to resolve.
    Wait,
    /// Send the visitor to login, remembering where they wanted to go.
    Redirect { to: Route, return_to: Route },
}

/// Decides whether `route` may render under `session`.
///
/// Re-evaluated on every session change, so a session expiring mid-visit
/// redirects immediately.
pub fn decide(route: &Route, session: &SessionState) -> GateDecision {
    if !route.is_protected() {
        return GateDecision::Allow;
    }
    if session.loading {
        return GateDecision::Wait;
    }
    if session.is_authenticated() {
        GateDecision::Allow
    } else {
        GateDecision::Redirect {
            to: Route::Login,
            return_to: route.clone(),
        }
    }
}
