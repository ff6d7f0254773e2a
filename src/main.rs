//! router-gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                    ROUTER GATEWAY                    │
//!                      │                                                      │
//!  Invocation / HTTP   │  ┌─────────┐    ┌─────────┐    ┌──────────────────┐  │
//!  ────────────────────┼─▶│ ingress │───▶│  http   │───▶│ readiness proxy  │  │
//!                      │  │ lambda/ │    │ server  │    │ retry until the  │  │
//!                      │  │ listener│    └─────────┘    │ router listens   │  │
//!                      │  └─────────┘                   └────────┬─────────┘  │
//!                      │                                         │ loopback   │
//!                      │  ┌──────────────────┐          ┌────────▼─────────┐  │
//!                      │  │ engine supervisor│─spawns──▶│  GraphQL router  │──┼──▶ Subgraphs
//!                      │  └──────────────────┘          │ + origin hooks   │  │
//!                      │                                └──────────────────┘  │
//!                      └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use router_gateway::config::GatewayArgs;
use router_gateway::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = GatewayArgs::parse();
    startup::run(args).await?;
    Ok(())
}
