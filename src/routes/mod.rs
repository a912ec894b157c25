/// Router Module Index
///
/// Splits the HTTP surface into the public health check and the navigation API.
/// Browser page navigations are not listed here: they reach the fallback
/// handler, where the route table and its guard decide what renders.

/// Unauthenticated operational routes (health).
pub mod public;

/// JSON navigation API used by the single-page client.
pub mod api;
