use tracing::debug;

use super::route::{RouteEntry, RouteName};
use crate::auth::AuthState;

/// NavigationDecision
///
/// Outcome of the guard for a single navigation attempt. A redirect names
/// the route to activate instead; the requested page is never rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect { to: RouteName },
}

/// before_navigate
///
/// Runs before the target page is rendered, on every navigation attempt.
/// Entries tagged `Access::Authenticated` redirect anonymous sessions to the
/// login route. Public entries, including the login route itself, are always
/// allowed; authenticated sessions are not bounced away from the login page.
///
/// *Mechanism*: the decision depends only on the entry's `Access` tag and on
/// `AuthState::is_authenticated`. The auth state is read by the extractor in
/// `crate::auth`, which reports `Anonymous` for anything it cannot verify, so
/// an unreadable session always lands on the login page.
///
/// *Goal*: one explicit check shared by the page fallback, the JSON API and
/// the in-process `Navigator`.
pub fn before_navigate(target: &RouteEntry, auth: &AuthState) -> NavigationDecision {
    let decision = if target.requires_auth() && !auth.is_authenticated() {
        NavigationDecision::Redirect {
            to: RouteName::Login,
        }
    } else {
        NavigationDecision::Allow
    };

    debug!(
        route = %target.name(),
        authenticated = auth.is_authenticated(),
        ?decision,
        "guard evaluated"
    );
    decision
}
