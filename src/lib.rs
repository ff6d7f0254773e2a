//! Front door for an embedded GraphQL router that is slow to start.
//!
//! Requests are held until the router accepts connections, forwarded
//! unchanged, and the router's answer is relayed back to the caller.

pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod http;
pub mod ingress;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{Forwarded, ProxyError, ReadinessProxy};
