//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → retries.rs (fresh RetryState from the RetryPolicy)
//!     → proxy attempt fails to connect → sleep delay → next attempt
//!     → bound reached → request fails, other requests unaffected
//! ```
//!
//! Backend (subgraph) retries belong to the engine, not to this crate.

pub mod retries;

pub use retries::{RetryPolicy, RetryState};
