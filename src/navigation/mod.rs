//! Route table, guard and per-session navigator for the library client.
//!
//! The table is built once at startup and shared read-only. Every navigation
//! attempt resolves the path in registration order and then runs the guard,
//! which redirects anonymous sessions away from authenticated routes.

pub mod guard;
pub mod navigator;
pub mod pattern;
pub mod route;
pub mod table;

pub use guard::{NavigationDecision, before_navigate};
pub use navigator::{ActivePage, Navigator};
pub use pattern::{PathParams, RoutePattern, encode_segment};
pub use route::{Access, RouteEntry, RouteName};
pub use table::{Navigation, RouteMatch, RouteTable, RouteTableState};
