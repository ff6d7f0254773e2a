//! Readiness-retry proxy subsystem.
//!
//! # Data Flow
//! ```text
//! inbound body (Bytes)
//!     → readiness.rs (RetryState per request)
//!     → transport.rs (POST to the engine's loopback endpoint)
//!         connection refused → sleep, next attempt
//!         response delivered → buffer body → Forwarded
//!     → error.rs (ProxyError when the loop cannot produce a response)
//! ```

pub mod error;
pub mod readiness;
pub mod transport;

pub use error::ProxyError;
pub use readiness::{Forwarded, ReadinessProxy};
pub use transport::{EngineTransport, HttpEngineTransport, TransportError};
