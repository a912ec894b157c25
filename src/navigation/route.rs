use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use ts_rs::TS;
use utoipa::ToSchema;

use super::pattern::RoutePattern;
use crate::{error::PatternError, pages::Page};

/// RouteName
///
/// Symbolic identifier of every page the client can navigate to. Used for
/// programmatic navigation (`RouteTable::url_for`) and as the redirect target
/// of the guard.
///
/// The enum is exported to TypeScript through `ts-rs` and to the OpenAPI
/// document through `utoipa`, so the client and the API agree on the same
/// set of names. Each name appears at most once in a table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema,
)]
#[ts(export)]
pub enum RouteName {
    Login,
    Dashboard,
    BookList,
    BookDetail,
    BorrowForm,
}

impl RouteName {
    pub const ALL: [RouteName; 5] = [
        RouteName::Login,
        RouteName::Dashboard,
        RouteName::BookList,
        RouteName::BookDetail,
        RouteName::BorrowForm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::Login => "Login",
            RouteName::Dashboard => "Dashboard",
            RouteName::BookList => "BookList",
            RouteName::BookDetail => "BookDetail",
            RouteName::BorrowForm => "BorrowForm",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access
///
/// The authentication requirement attached to each route entry. The guard
/// only ever looks at this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable in any authentication state.
    Public,
    /// Unauthenticated navigations are redirected to the login route.
    Authenticated,
}

/// RouteEntry
///
/// One path-to-page mapping: a parsed pattern, the symbolic name, the access
/// tag read by the guard and the page collaborator that renders it.
///
/// *Lifecycle*: entries are built once at startup by `RouteTable::library` (or
/// a test's own table) and never mutated afterwards. The page sits behind an
/// `Arc` so a cloned entry shares the same collaborator.
#[derive(Clone)]
pub struct RouteEntry {
    name: RouteName,
    pattern: RoutePattern,
    access: Access,
    page: Arc<dyn Page>,
}

impl RouteEntry {
    /// Parses `path` and bundles it with the rest of the entry.
    ///
    /// # Errors
    /// Returns the `PatternError` of a malformed pattern.
    pub fn new(
        path: &str,
        name: RouteName,
        access: Access,
        page: Arc<dyn Page>,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            name,
            pattern: RoutePattern::parse(path)?,
            access,
            page,
        })
    }

    pub fn name(&self) -> RouteName {
        self.name
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Shorthand for `access() == Access::Authenticated`.
    pub fn requires_auth(&self) -> bool {
        self.access == Access::Authenticated
    }

    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("name", &self.name)
            .field("path", &self.pattern.as_str())
            .field("access", &self.access)
            .field("page", &self.page.title())
            .finish()
    }
}
