//! # SVS Rust Backend
//!
//! Supervision schedule allocation engine.
//!
//! This crate allocates recurring supervision time-blocks to multiple
//! clients across a date range, subject to per-client authorized time
//! windows, a supervisor's recurring and date-specific availability,
//! monthly target hours, minimum session granularity, weekly session caps,
//! and day-of-week preferences. The optional HTTP layer exposes the engine
//! as a REST API via Axum.
//!
//! ## Features
//!
//! - **Interval algebra**: minute-of-day time blocks with intersection,
//!   merge, and subtraction
//! - **Availability resolution**: usable intervals per client per date,
//!   after closed dates and one-off exceptions
//! - **Capacity planning**: even-pacing weekly session caps derived from
//!   remaining need
//! - **Greedy allocation**: priority-scored placement with a residual
//!   top-up pass
//! - **HTTP API**: RESTful endpoint for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: request/response data types (DTOs)
//! - [`models`]: interval primitives and request parsing/normalization
//! - [`scheduler`]: the allocation engine itself
//! - [`services`]: run summary and progress reporting
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Determinism
//!
//! [`scheduler::generate`] is pure: no I/O, no global state, and identical
//! requests always produce identical block lists. Independent requests can
//! be evaluated concurrently since runs share no state.

pub mod api;
pub mod models;
pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
