use std::sync::Arc;
use tracing::debug;

use super::{
    guard::NavigationDecision,
    pattern::PathParams,
    route::RouteName,
    table::RouteTable,
};
use crate::{auth::AuthState, error::NavigationError};

/// ActivePage
///
/// The page currently instantiated by a navigator. Replaced wholesale on the
/// next navigation; the old value is dropped, which is the teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePage {
    pub route: RouteName,
    pub params: PathParams,
    /// Concrete path of the active page, e.g. `/books/42` or `/login`.
    pub location: String,
    /// Set when the guard replaced the requested route with the login page.
    pub redirected_from: Option<RouteName>,
    pub body: String,
}

/// Navigator
///
/// Per-session navigation state: the active page and the back/forward
/// history. Every navigation, including history moves, goes through
/// resolve and the guard again.
///
/// *Mechanism*: `history` stores the location of every page that actually
/// became active, so an anonymous visit to `/dashboard` records `/login`.
/// `cursor` indexes the active entry. A fresh navigation drops everything
/// after the cursor before pushing, the way a browser does.
///
/// *Goal*: the same guard semantics for in-process navigation as for page
/// loads served over HTTP, with one table shared by every session.
pub struct Navigator {
    table: Arc<RouteTable>,
    base_path: String,
    history: Vec<String>,
    cursor: usize,
    current: Option<ActivePage>,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self::with_base_path(table, "")
    }

    pub fn with_base_path(table: Arc<RouteTable>, base_path: impl Into<String>) -> Self {
        Self {
            table,
            base_path: base_path.into(),
            history: Vec::new(),
            cursor: 0,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&ActivePage> {
        self.current.as_ref()
    }

    /// History entries, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Index into `history` of the active entry. Zero before the first
    /// navigation.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// navigate
    ///
    /// Activates the page for `path` and records it in history, discarding any
    /// forward entries. On `NotFound` nothing changes.
    pub fn navigate(
        &mut self,
        path: &str,
        auth: &AuthState,
    ) -> Result<&ActivePage, NavigationError> {
        let page = self.instantiate(path, auth)?;

        if !self.history.is_empty() {
            self.history.truncate(self.cursor + 1);
        }
        self.history.push(page.location.clone());
        self.cursor = self.history.len() - 1;

        Ok(self.activate(page))
    }

    /// Moves one entry back in history. `None` at the oldest entry.
    ///
    /// The cursor only moves once the recorded path has been re-resolved and
    /// re-guarded, so on `Err` both the cursor and the active page stay put.
    pub fn back(&mut self, auth: &AuthState) -> Option<Result<&ActivePage, NavigationError>> {
        let index = self.cursor.checked_sub(1)?;
        Some(self.revisit(index, auth))
    }

    /// Moves one entry forward in history. `None` at the newest entry.
    pub fn forward(&mut self, auth: &AuthState) -> Option<Result<&ActivePage, NavigationError>> {
        let index = self.cursor + 1;
        if index >= self.history.len() {
            return None;
        }
        Some(self.revisit(index, auth))
    }

    fn revisit(&mut self, index: usize, auth: &AuthState) -> Result<&ActivePage, NavigationError> {
        let page = self.instantiate(&self.history[index], auth)?;
        self.cursor = index;
        Ok(self.activate(page))
    }

    fn instantiate(&self, path: &str, auth: &AuthState) -> Result<ActivePage, NavigationError> {
        let navigation = self.table.navigate(path, auth)?;
        let target = &navigation.target;

        Ok(ActivePage {
            route: target.entry.name(),
            params: target.params.clone(),
            location: target.location(),
            redirected_from: match navigation.decision {
                NavigationDecision::Allow => None,
                NavigationDecision::Redirect { .. } => Some(navigation.requested),
            },
            body: target.render(auth, &self.base_path),
        })
    }

    fn activate(&mut self, page: ActivePage) -> &ActivePage {
        if let Some(previous) = self.current.take() {
            debug!(route = %previous.route, location = %previous.location, "page torn down");
        }
        self.current.insert(page)
    }
}
