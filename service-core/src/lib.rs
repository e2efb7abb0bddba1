//! service-core: Shared infrastructure for the product microservice.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use mongodb;
pub use tokio;
pub use tracing;
