use crate::{
    AppState,
    auth::AuthState,
    models::{NavigateQuery, NavigationResponse, RouteSummary},
    navigation::{NavigationDecision, PathParams},
    pages::{NotFoundPage, Page, PageContext},
};
use axum::{
    Json,
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

// --- Handlers ---

/// health
///
/// [Public Route] Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}

/// list_routes
///
/// [Public Route] Lists the registered routes in registration order.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route table", body = [RouteSummary]))
)]
pub async fn list_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    let routes = state
        .routes
        .entries()
        .iter()
        .map(|entry| RouteSummary {
            name: entry.name(),
            path: entry.path().to_string(),
            requires_auth: entry.requires_auth(),
        })
        .collect();
    Json(routes)
}

/// navigate
///
/// [Public Route] Resolves and guards a programmatic navigation without
/// rendering. The session is read from the request; unreadable sessions are
/// anonymous.
#[utoipa::path(
    get,
    path = "/api/navigate",
    params(NavigateQuery),
    responses(
        (status = 200, description = "Allowed or redirected", body = NavigationResponse),
        (status = 404, description = "No route matches", body = NavigationResponse)
    )
)]
pub async fn navigate(
    State(state): State<AppState>,
    auth: AuthState,
    Query(query): Query<NavigateQuery>,
) -> Response {
    let navigation = match state.routes.navigate(&query.path, &auth) {
        Ok(navigation) => navigation,
        Err(e) => {
            info!(error = %e, "navigation target not found");
            let body = NavigationResponse::NotFound { path: query.path };
            return (StatusCode::NOT_FOUND, Json(body)).into_response();
        }
    };

    let location = state.config.with_base(&navigation.target.location());
    let body = match navigation.decision {
        NavigationDecision::Allow => NavigationResponse::Allow {
            route: navigation.target.entry.name(),
            params: navigation.target.params.as_map().clone(),
            location,
        },
        NavigationDecision::Redirect { to } => NavigationResponse::Redirect {
            from: navigation.requested,
            to,
            location,
        },
    };
    Json(body).into_response()
}

/// navigate_page
///
/// Fallback for every path not claimed by another route: a browser
/// navigation. Allowed pages render, gated pages redirect to the login page
/// with `303 See Other`, unknown paths render the not-found page.
pub async fn navigate_page(
    State(state): State<AppState>,
    auth: AuthState,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let base_path = state.config.base_path.as_str();
    let Some(path) = state.config.strip_base(uri.path()) else {
        return not_found(&auth, base_path);
    };

    match state.routes.navigate(path, &auth) {
        Ok(navigation) => match navigation.decision {
            NavigationDecision::Allow => {
                Html(navigation.target.render(&auth, base_path)).into_response()
            }
            NavigationDecision::Redirect { .. } => {
                let location = state.config.with_base(&navigation.target.location());
                Redirect::to(&location).into_response()
            }
        },
        Err(e) => {
            info!(error = %e, "page not found");
            not_found(&auth, base_path)
        }
    }
}

fn not_found(auth: &AuthState, base_path: &str) -> Response {
    let params = PathParams::new();
    let ctx = PageContext {
        params: &params,
        auth,
        base_path,
    };
    (StatusCode::NOT_FOUND, Html(NotFoundPage.render(&ctx))).into_response()
}
