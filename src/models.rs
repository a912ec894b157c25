use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::navigation::RouteName;

// --- Response Schemas (shared with the single-page client) ---

/// RouteSummary
///
/// One registered route as listed by `GET /api/routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteSummary {
    pub name: RouteName,
    // Pattern as registered, e.g. `/books/:id`.
    pub path: String,
    pub requires_auth: bool,
}

/// NavigationResponse
///
/// Outcome of `GET /api/navigate`. The client performs the actual page swap;
/// `location` already includes the base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export)]
pub enum NavigationResponse {
    Allow {
        route: RouteName,
        params: BTreeMap<String, String>,
        location: String,
    },
    Redirect {
        from: RouteName,
        to: RouteName,
        location: String,
    },
    NotFound {
        path: String,
    },
}

// --- Request Payloads ---

/// NavigateQuery
///
/// Query parameters of `GET /api/navigate`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NavigateQuery {
    /// Application path to navigate to, e.g. `/books/42`.
    pub path: String,
}
