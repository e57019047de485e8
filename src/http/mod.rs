//! Axum-based HTTP server layer.
//!
//! Thin transport over the allocation core: one generation endpoint plus a
//! health check. Enabled by the `http-server` feature.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;

pub use router::create_router;
