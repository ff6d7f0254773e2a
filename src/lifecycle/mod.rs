//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Logging/metrics → Hook registry → Engine → Ingress
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT or Shutdown::trigger → stop accepting → drain → exit
//! ```
//!
//! In embedded mode the serverless runtime owns the process lifetime and no
//! shutdown path runs.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
