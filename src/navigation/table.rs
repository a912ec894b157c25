use std::sync::Arc;
use tracing::{debug, info};

use super::{
    guard::{NavigationDecision, before_navigate},
    pattern::PathParams,
    route::{Access, RouteEntry, RouteName},
};
use crate::{
    auth::AuthState,
    error::{NavigationError, RouteTableError},
    pages::{BookDetailPage, BookListPage, BorrowFormPage, DashboardPage, LoginPage, PageContext},
};

/// RouteTableState
///
/// The route table as it is shared across request handlers. Cloning the
/// `Arc` is all a handler pays to read it; `AppState` hands it out through
/// `FromRef`.
pub type RouteTableState = Arc<RouteTable>;

/// RouteTable
///
/// The ordered, immutable set of route entries. Construction validates the
/// invariants once; afterwards the table is only read.
///
/// *Invariants*: names are unique, no two patterns can match the same path,
/// and a public `Login` entry exists. `login` caches that entry's index so
/// the guard's redirect target never has to be searched for or unwrapped.
///
/// *Resolution*: `resolve` walks entries in registration order and returns
/// the first match. With overlaps rejected at construction there is at most
/// one match anyway.
#[derive(Debug)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    login: usize,
}

/// RouteMatch
///
/// A resolved route together with the parameters captured from the path.
/// Borrows the entry from the table it was resolved against.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: PathParams,
}

/// Navigation
///
/// The result of resolving and guarding one navigation attempt. `target` is
/// the page that should become active: the requested one on `Allow`, the
/// login route on `Redirect`.
#[derive(Debug, Clone)]
pub struct Navigation<'a> {
    pub requested: RouteName,
    pub decision: NavigationDecision,
    pub target: RouteMatch<'a>,
}

impl RouteMatch<'_> {
    /// Concrete path of the match, e.g. `/books/42`, with parameters encoded
    /// again. Falls back to the raw pattern if a parameter is missing, which a
    /// match produced by `resolve` never is.
    pub fn location(&self) -> String {
        self.entry
            .pattern()
            .build(&self.params)
            .unwrap_or_else(|_| self.entry.path().to_string())
    }

    /// Instantiates the entry's page with the captured parameters and the
    /// session's auth state. Links inside the page are prefixed with
    /// `base_path`.
    pub fn render(&self, auth: &AuthState, base_path: &str) -> String {
        let ctx = PageContext {
            params: &self.params,
            auth,
            base_path,
        };
        self.entry.page().render(&ctx)
    }
}

impl RouteTable {
    /// new
    ///
    /// Registers `entries` in order. Fails when a name repeats, when two
    /// patterns can match the same path, or when the `Login` entry is missing
    /// or itself requires authentication.
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, RouteTableError> {
        for (i, entry) in entries.iter().enumerate() {
            for earlier in &entries[..i] {
                if earlier.name() == entry.name() {
                    return Err(RouteTableError::DuplicateName(entry.name()));
                }
                if earlier.pattern().overlaps(entry.pattern()) {
                    return Err(RouteTableError::AmbiguousPatterns {
                        first: earlier.path().to_string(),
                        second: entry.path().to_string(),
                    });
                }
            }
        }

        let login = entries
            .iter()
            .position(|e| e.name() == RouteName::Login)
            .ok_or(RouteTableError::MissingLogin(RouteName::Login))?;
        if entries[login].requires_auth() {
            return Err(RouteTableError::GatedLogin(RouteName::Login));
        }

        info!(routes = entries.len(), "route table registered");
        Ok(Self { entries, login })
    }

    /// library
    ///
    /// The five pages of the library client: `/login` is public, the
    /// dashboard, the book list, book details and the borrow form require an
    /// authenticated session. Built once in `main` and shared read-only.
    pub fn library() -> Result<Self, RouteTableError> {
        Self::new(vec![
            RouteEntry::new(
                "/login",
                RouteName::Login,
                Access::Public,
                Arc::new(LoginPage),
            )?,
            RouteEntry::new(
                "/dashboard",
                RouteName::Dashboard,
                Access::Authenticated,
                Arc::new(DashboardPage),
            )?,
            RouteEntry::new(
                "/books",
                RouteName::BookList,
                Access::Authenticated,
                Arc::new(BookListPage),
            )?,
            RouteEntry::new(
                "/books/:id",
                RouteName::BookDetail,
                Access::Authenticated,
                Arc::new(BookDetailPage),
            )?,
            RouteEntry::new(
                "/borrow/:id",
                RouteName::BorrowForm,
                Access::Authenticated,
                Arc::new(BorrowFormPage),
            )?,
        ])
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn get(&self, name: RouteName) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn login_entry(&self) -> &RouteEntry {
        &self.entries[self.login]
    }

    /// resolve
    ///
    /// Walks the entries in registration order and returns the first match.
    ///
    /// # Errors
    /// `NavigationError::NotFound` when no pattern matches. This includes
    /// parameters that do not percent-decode to UTF-8.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<'_>, NavigationError> {
        self.entries
            .iter()
            .find_map(|entry| {
                entry
                    .pattern()
                    .matches(path)
                    .map(|params| RouteMatch { entry, params })
            })
            .ok_or_else(|| NavigationError::NotFound {
                path: path.to_string(),
            })
    }

    /// Applies the guard to an already resolved entry.
    pub fn before_navigate(&self, target: &RouteEntry, auth: &AuthState) -> NavigationDecision {
        before_navigate(target, auth)
    }

    /// navigate
    ///
    /// Resolves `path`, runs the guard and picks the page to activate.
    ///
    /// *Mechanism*: on `Redirect` the target becomes the login entry with no
    /// parameters; the requested route is kept in `Navigation::requested` so
    /// callers can report where the session was headed. Resolution errors are
    /// returned before the guard runs.
    pub fn navigate(
        &self,
        path: &str,
        auth: &AuthState,
    ) -> Result<Navigation<'_>, NavigationError> {
        let matched = self.resolve(path)?;
        let requested = matched.entry.name();
        let decision = before_navigate(matched.entry, auth);

        let target = match decision {
            NavigationDecision::Allow => matched,
            NavigationDecision::Redirect { to } => {
                let entry = self.get(to).unwrap_or_else(|| self.login_entry());
                info!(from = %requested, to = %entry.name(), "navigation redirected");
                RouteMatch {
                    entry,
                    params: PathParams::new(),
                }
            }
        };

        debug!(path, route = %target.entry.name(), "navigation resolved");
        Ok(Navigation {
            requested,
            decision,
            target,
        })
    }

    /// url_for
    ///
    /// Builds the concrete path of a named route, percent-encoding each
    /// parameter value.
    ///
    /// # Errors
    /// `UnknownRoute` when the table has no such entry, `MissingParam` when a
    /// parameter the pattern names is absent or empty.
    pub fn url_for(&self, name: RouteName, params: &PathParams) -> Result<String, NavigationError> {
        let entry = self.get(name).ok_or(NavigationError::UnknownRoute(name))?;
        entry
            .pattern()
            .build(params)
            .map_err(|param| NavigationError::MissingParam { route: name, param })
    }
}
