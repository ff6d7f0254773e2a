//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! standalone TCP connection / serverless invocation
//!     → server.rs (Axum router, middleware)
//!     → request.rs (request ID, span)
//!     → relay handler → proxy::ReadinessProxy
//!     → response.rs (relayed response or server error)
//!     → back through the originating transport
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, SharedProxy};
