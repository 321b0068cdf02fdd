//! HTTP adapter - ingestion, one-shot reads, and the SSE stream.

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod sse;

pub use handlers::{RelayState, TRACKER_SECRET_HEADER};
pub use routes::relay_routes;
