//! Server module wiring the validation engine to axum
//!
//! The engine itself owns no HTTP surface; this module adapts incoming
//! requests into [`RequestInputs`](crate::core::inputs::RequestInputs),
//! dispatches to the demo handlers, and renders errors as JSON responses.

pub mod builder;
pub mod extract;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_routes;
