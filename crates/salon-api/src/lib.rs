//! SEA Salon HTTP API
//!
//! Axum router for the salon backend: the JSON API behind the session gate,
//! the gated HTML pages, health checks and Prometheus metrics.

pub mod error;
pub mod response;
pub mod routes;
pub mod state;
pub mod validation;

pub use error::{ApiError, Sentinel};
pub use response::{ApiJson, ApiSuccess};
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
