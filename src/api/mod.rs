//! HTTP API module: opportunities endpoint, scan page, health and metrics.

pub mod handlers;
pub mod page;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
