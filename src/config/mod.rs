//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → flags / environment variables (args.rs)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! Config is resolved once at startup. Nothing reloads it while requests are
//! being served.

pub mod args;
pub mod loader;
pub mod schema;
pub mod validation;

pub use args::GatewayArgs;
pub use loader::{resolve_config, ConfigError};
pub use schema::{
    EngineConfig, EngineFailurePolicy, GatewayConfig, ListenerConfig, ObservabilityConfig,
    ProxySettings, RetryConfig,
};
