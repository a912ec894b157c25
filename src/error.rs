use thiserror::Error;

use crate::navigation::RouteName;

/// Raised while parsing a route pattern such as `/books/:id`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),
    #[error("pattern `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("pattern `{pattern}` declares an unnamed parameter")]
    UnnamedParam { pattern: String },
    #[error("pattern `{pattern}` declares parameter `{param}` twice")]
    DuplicateParam { pattern: String, param: String },
}

/// Raised when the route table is assembled at startup. Any of these aborts
/// the process before the server binds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("route name `{0}` is registered more than once")]
    DuplicateName(RouteName),
    #[error("patterns `{first}` and `{second}` can match the same path")]
    AmbiguousPatterns { first: String, second: String },
    #[error("login route `{0}` is not registered")]
    MissingLogin(RouteName),
    #[error("login route `{0}` requires authentication and would redirect to itself")]
    GatedLogin(RouteName),
}

/// Raised by navigation and reverse URL building.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route matches `{path}`")]
    NotFound { path: String },
    #[error("route `{0}` is not registered")]
    UnknownRoute(RouteName),
    #[error("route `{route}` needs parameter `{param}`")]
    MissingParam { route: RouteName, param: String },
}

/// Raised while loading `AppConfig` from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    MissingVar(&'static str),
    #[error("BIND_ADDR `{0}` is not a valid socket address")]
    InvalidBindAddr(String),
}
